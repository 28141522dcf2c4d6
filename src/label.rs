//! Axis labels with a small subset of TeX math markup.
//!
//! egui has no math typesetting, so `$...$` spans are rewritten to plain
//! Unicode: `\dot{z}` → `ż`, `\alpha` → `α`, `x^2` → `x²`, `v_0` → `v₀`.
//! Text outside `$` delimiters is kept as is. Unknown commands keep their
//! name without the backslash.

const COMBINING_DOT: char = '\u{0307}';
const COMBINING_DIAERESIS: char = '\u{0308}';

const GREEK: &[(&str, char)] = &[
    ("alpha", 'α'),
    ("beta", 'β'),
    ("gamma", 'γ'),
    ("delta", 'δ'),
    ("epsilon", 'ε'),
    ("varepsilon", 'ε'),
    ("zeta", 'ζ'),
    ("eta", 'η'),
    ("theta", 'θ'),
    ("lambda", 'λ'),
    ("mu", 'μ'),
    ("nu", 'ν'),
    ("xi", 'ξ'),
    ("pi", 'π'),
    ("rho", 'ρ'),
    ("sigma", 'σ'),
    ("tau", 'τ'),
    ("phi", 'φ'),
    ("varphi", 'φ'),
    ("chi", 'χ'),
    ("psi", 'ψ'),
    ("omega", 'ω'),
    ("Gamma", 'Γ'),
    ("Delta", 'Δ'),
    ("Theta", 'Θ'),
    ("Lambda", 'Λ'),
    ("Pi", 'Π'),
    ("Sigma", 'Σ'),
    ("Phi", 'Φ'),
    ("Omega", 'Ω'),
];

/// Render a label, rewriting every closed `$...$` span.
/// An unmatched trailing `$` is kept as text.
pub fn render_math(label: &str) -> String {
    let parts: Vec<&str> = label.split('$').collect();
    let last = parts.len() - 1;
    let mut out = String::with_capacity(label.len());
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(part);
        } else if i < last {
            out.push_str(&render_math_span(part));
        } else {
            out.push('$');
            out.push_str(part);
        }
    }
    out
}

fn render_math_span(span: &str) -> String {
    let mut out = String::new();
    let mut chars = span.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                match name.as_str() {
                    "dot" | "ddot" => {
                        out.push_str(&render_math_span(&take_group(&mut chars)));
                        out.push(if name == "dot" {
                            COMBINING_DOT
                        } else {
                            COMBINING_DIAERESIS
                        });
                    }
                    "mathrm" | "mathit" | "mathbf" | "text" | "operatorname" => {
                        out.push_str(&render_math_span(&take_group(&mut chars)));
                    }
                    "" => {
                        // Escaped character such as `\,` or `\{`.
                        if let Some(n) = chars.next() {
                            if !matches!(n, ',' | ';' | '!' | ' ') {
                                out.push(n);
                            }
                        }
                    }
                    other => match GREEK.iter().find(|(cmd, _)| *cmd == other) {
                        Some((_, g)) => out.push(*g),
                        None => out.push_str(other),
                    },
                }
            }
            '^' => {
                for g in render_math_span(&take_group(&mut chars)).chars() {
                    out.push(superscript(g).unwrap_or(g));
                }
            }
            '_' => {
                for g in render_math_span(&take_group(&mut chars)).chars() {
                    out.push(subscript(g).unwrap_or(g));
                }
            }
            '{' | '}' => {}
            other => out.push(other),
        }
    }
    out
}

/// Next `{...}` group or single character.
fn take_group(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
    match chars.next() {
        Some('{') => {
            let mut depth = 1;
            let mut group = String::new();
            for c in chars.by_ref() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                group.push(c);
            }
            group
        }
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

fn superscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        '+' => '⁺',
        '-' => '⁻',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        _ => return None,
    })
}

fn subscript(c: char) -> Option<char> {
    Some(match c {
        '0' => '₀',
        '1' => '₁',
        '2' => '₂',
        '3' => '₃',
        '4' => '₄',
        '5' => '₅',
        '6' => '₆',
        '7' => '₇',
        '8' => '₈',
        '9' => '₉',
        '+' => '₊',
        '-' => '₋',
        _ => return None,
    })
}
