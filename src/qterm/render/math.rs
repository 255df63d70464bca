//! LaTeX-to-Unicode conversion for math regions.
//!
//! Covers the notation the tutor actually produces: Greek letters, operators,
//! Dirac brackets, accents, fractions, roots and simple sub/superscripts.
//! Unknown control words are kept verbatim; only structural problems
//! (unbalanced braces, missing arguments) are errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("unbalanced braces")]
    UnbalancedBraces,

    #[error("missing argument for {0}")]
    MissingArgument(String),

    #[error("trailing backslash")]
    TrailingBackslash,
}

pub fn to_unicode(src: &str) -> Result<String, MathError> {
    let mut parser = Parser {
        chars: src.chars().peekable(),
    };
    parser.sequence(false)
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl Parser<'_> {
    fn sequence(&mut self, in_group: bool) -> Result<String, MathError> {
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '{' => out.push_str(&self.sequence(true)?),
                '}' if in_group => return Ok(out),
                '}' => return Err(MathError::UnbalancedBraces),
                '\\' => out.push_str(&self.command()?),
                '^' => {
                    let arg = self.argument("^")?;
                    out.push_str(&script(&arg, superscript, '^'));
                }
                '_' => {
                    let arg = self.argument("_")?;
                    out.push_str(&script(&arg, subscript, '_'));
                }
                '~' => out.push(' '),
                c => out.push(c),
            }
        }
        if in_group {
            Err(MathError::UnbalancedBraces)
        } else {
            Ok(out)
        }
    }

    fn argument(&mut self, owner: &str) -> Result<String, MathError> {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
        match self.chars.next() {
            None | Some('}') => Err(MathError::MissingArgument(owner.to_string())),
            Some('{') => self.sequence(true),
            Some('\\') => self.command(),
            Some(c) => Ok(c.to_string()),
        }
    }

    fn command(&mut self) -> Result<String, MathError> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            name.push(c);
            self.chars.next();
        }

        if name.is_empty() {
            return match self.chars.next() {
                None => Err(MathError::TrailingBackslash),
                Some(',' | ';' | ':' | ' ' | '\\') => Ok(" ".to_string()),
                Some('!') => Ok(String::new()),
                Some(c) => Ok(c.to_string()),
            };
        }

        let owner = format!("\\{}", name);
        let converted = match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let num = self.argument(&owner)?;
                let den = self.argument(&owner)?;
                format!("{}/{}", group(&num), group(&den))
            }
            "sqrt" => format!("√{}", group(&self.argument(&owner)?)),
            "hat" | "widehat" => accent(&self.argument(&owner)?, '\u{0302}'),
            "tilde" | "widetilde" => accent(&self.argument(&owner)?, '\u{0303}'),
            "bar" | "overline" => accent(&self.argument(&owner)?, '\u{0305}'),
            "dot" => accent(&self.argument(&owner)?, '\u{0307}'),
            "ddot" => accent(&self.argument(&owner)?, '\u{0308}'),
            "vec" => accent(&self.argument(&owner)?, '\u{20D7}'),
            "bra" => format!("⟨{}|", self.argument(&owner)?),
            "ket" => format!("|{}⟩", self.argument(&owner)?),
            "braket" => format!("⟨{}⟩", self.argument(&owner)?),
            "text" | "mathrm" | "mathbf" | "mathit" | "mathcal" | "mathsf" | "boldsymbol"
            | "operatorname" => self.argument(&owner)?,
            "left" | "right" | "big" | "Big" | "bigg" | "Bigg" | "bigl" | "bigr" | "displaystyle" => {
                String::new()
            }
            other => match symbol(other) {
                Some(s) => s.to_string(),
                None => owner,
            },
        };
        Ok(converted)
    }
}

fn group(s: &str) -> String {
    if s.chars().count() > 1 && !(s.starts_with('(') && s.ends_with(')')) {
        format!("({})", s)
    } else {
        s.to_string()
    }
}

fn accent(base: &str, mark: char) -> String {
    let mut out = base.to_string();
    out.push(mark);
    out
}

fn script(arg: &str, map: fn(char) -> Option<char>, marker: char) -> String {
    if matches!(arg, "†" | "*" | "∗" | "′" | "″") {
        return arg.to_string();
    }
    let mapped: Option<String> = arg.chars().map(map).collect();
    match mapped {
        Some(s) if !s.is_empty() => s,
        _ if arg.chars().count() == 1 => format!("{}{}", marker, arg),
        _ => format!("{}({})", marker, arg),
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
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'n' => 'ⁿ',
        'i' => 'ⁱ',
        'a' => 'ᵃ',
        'b' => 'ᵇ',
        'c' => 'ᶜ',
        'd' => 'ᵈ',
        'e' => 'ᵉ',
        'k' => 'ᵏ',
        'm' => 'ᵐ',
        't' => 'ᵗ',
        'x' => 'ˣ',
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
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

fn symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" | "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" | "vartheta" => "θ",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "phi" | "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "hbar" | "hslash" => "ħ",
        "ell" => "ℓ",
        "partial" => "∂",
        "nabla" => "∇",
        "infty" => "∞",
        "pm" => "±",
        "mp" => "∓",
        "times" => "×",
        "cdot" => "·",
        "circ" => "∘",
        "ast" => "∗",
        "star" => "⋆",
        "dagger" => "†",
        "prime" => "′",
        "langle" => "⟨",
        "rangle" => "⟩",
        "vert" | "lvert" | "rvert" | "mid" => "|",
        "Vert" | "lVert" | "rVert" => "‖",
        "otimes" => "⊗",
        "oplus" => "⊕",
        "approx" => "≈",
        "simeq" => "≃",
        "sim" => "∼",
        "neq" | "ne" => "≠",
        "leq" | "le" => "≤",
        "geq" | "ge" => "≥",
        "ll" => "≪",
        "gg" => "≫",
        "equiv" => "≡",
        "propto" => "∝",
        "perp" => "⊥",
        "parallel" => "∥",
        "in" => "∈",
        "forall" => "∀",
        "exists" => "∃",
        "to" | "rightarrow" => "→",
        "leftarrow" => "←",
        "Rightarrow" => "⇒",
        "Leftarrow" => "⇐",
        "leftrightarrow" => "↔",
        "Leftrightarrow" => "⇔",
        "int" => "∫",
        "oint" => "∮",
        "sum" => "∑",
        "prod" => "∏",
        "ldots" | "dots" => "…",
        "cdots" => "⋯",
        "Re" => "ℜ",
        "Im" => "ℑ",
        "quad" => "  ",
        "qquad" => "    ",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "exp" => "exp",
        "log" => "log",
        "ln" => "ln",
        "det" => "det",
        "tr" | "Tr" => "Tr",
        "max" => "max",
        "min" => "min",
        "lim" => "lim",
        _ => return None,
    })
}
