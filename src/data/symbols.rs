//! LaTeX symbol and command mappings
//!
//! Static tables mapping LaTeX commands to the Unicode glyphs (or fixed-width
//! space strings) emitted into equation runs. Commands are always looked up as
//! whole tokens, so no entry can shadow a longer command name.

use phf::{phf_map, phf_set};

/// LaTeX command to Unicode glyph mapping.
///
/// Covers Greek letters, operators, relations, set theory, logic, calculus,
/// arrows, dots, miscellaneous symbols, spacing commands and escaped
/// characters. Spacing commands map to fixed-width space strings; `\!` maps
/// to the empty string (zero-width).
pub static SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    // Greek letters (lowercase)
    r"\alpha" => "α",
    r"\beta" => "β",
    r"\gamma" => "γ",
    r"\delta" => "δ",
    r"\epsilon" => "ε",
    r"\varepsilon" => "ε",
    r"\zeta" => "ζ",
    r"\eta" => "η",
    r"\theta" => "θ",
    r"\vartheta" => "ϑ",
    r"\iota" => "ι",
    r"\kappa" => "κ",
    r"\lambda" => "λ",
    r"\mu" => "μ",
    r"\nu" => "ν",
    r"\xi" => "ξ",
    r"\pi" => "π",
    r"\varpi" => "ϖ",
    r"\rho" => "ρ",
    r"\varrho" => "ϱ",
    r"\sigma" => "σ",
    r"\varsigma" => "ς",
    r"\tau" => "τ",
    r"\upsilon" => "υ",
    r"\phi" => "φ",
    r"\varphi" => "φ",
    r"\chi" => "χ",
    r"\psi" => "ψ",
    r"\omega" => "ω",

    // Greek letters (uppercase)
    r"\Gamma" => "Γ",
    r"\Delta" => "Δ",
    r"\Theta" => "Θ",
    r"\Lambda" => "Λ",
    r"\Xi" => "Ξ",
    r"\Pi" => "Π",
    r"\Sigma" => "Σ",
    r"\Upsilon" => "Υ",
    r"\Phi" => "Φ",
    r"\Psi" => "Ψ",
    r"\Omega" => "Ω",

    // Binary operators
    r"\pm" => "±",
    r"\mp" => "∓",
    r"\times" => "×",
    r"\div" => "÷",
    r"\cdot" => "·",
    r"\centerdot" => "·",
    r"\ast" => "∗",
    r"\star" => "⋆",
    r"\bullet" => "•",
    r"\circ" => "∘",
    r"\oplus" => "⊕",
    r"\ominus" => "⊖",
    r"\otimes" => "⊗",
    r"\oslash" => "⊘",
    r"\odot" => "⊙",

    // Relations
    r"\leq" => "≤",
    r"\le" => "≤",
    r"\geq" => "≥",
    r"\ge" => "≥",
    r"\neq" => "≠",
    r"\ne" => "≠",
    r"\approx" => "≈",
    r"\equiv" => "≡",
    r"\sim" => "∼",
    r"\simeq" => "≃",
    r"\cong" => "≅",
    r"\propto" => "∝",
    r"\ll" => "≪",
    r"\gg" => "≫",
    r"\prec" => "≺",
    r"\succ" => "≻",
    r"\preceq" => "⪯",
    r"\succeq" => "⪰",

    // Set theory
    r"\subset" => "⊂",
    r"\supset" => "⊃",
    r"\subseteq" => "⊆",
    r"\supseteq" => "⊇",
    r"\in" => "∈",
    r"\notin" => "∉",
    r"\ni" => "∋",
    r"\cup" => "∪",
    r"\cap" => "∩",
    r"\setminus" => "∖",
    r"\emptyset" => "∅",
    r"\varnothing" => "∅",

    // Logic
    r"\vee" => "∨",
    r"\lor" => "∨",
    r"\wedge" => "∧",
    r"\land" => "∧",
    r"\neg" => "¬",
    r"\lnot" => "¬",
    r"\forall" => "∀",
    r"\exists" => "∃",
    r"\nexists" => "∄",
    r"\therefore" => "∴",
    r"\because" => "∵",

    // Calculus
    r"\partial" => "∂",
    r"\nabla" => "∇",
    r"\infty" => "∞",
    r"\oint" => "∮",
    r"\iint" => "∬",
    r"\iiint" => "∭",

    // Arrows
    r"\to" => "→",
    r"\gets" => "←",
    r"\rightarrow" => "→",
    r"\leftarrow" => "←",
    r"\leftrightarrow" => "↔",
    r"\Rightarrow" => "⇒",
    r"\Leftarrow" => "⇐",
    r"\Leftrightarrow" => "⇔",
    r"\uparrow" => "↑",
    r"\downarrow" => "↓",
    r"\updownarrow" => "↕",
    r"\Uparrow" => "⇑",
    r"\Downarrow" => "⇓",
    r"\Updownarrow" => "⇕",
    r"\mapsto" => "↦",
    r"\longmapsto" => "⟼",
    r"\longrightarrow" => "⟶",
    r"\longleftarrow" => "⟵",
    r"\longleftrightarrow" => "⟷",
    r"\Longrightarrow" => "⟹",
    r"\Longleftarrow" => "⟸",
    r"\Longleftrightarrow" => "⟺",
    r"\hookrightarrow" => "↪",
    r"\hookleftarrow" => "↩",

    // Dots
    r"\ldots" => "…",
    r"\cdots" => "⋯",
    r"\vdots" => "⋮",
    r"\ddots" => "⋱",
    r"\dots" => "…",

    // Miscellaneous
    r"\prime" => "′",
    r"\degree" => "°",
    r"\angle" => "∠",
    r"\triangle" => "△",
    r"\square" => "□",
    r"\diamond" => "◇",
    r"\perp" => "⊥",
    r"\parallel" => "∥",
    r"\mid" => "∣",
    r"\nmid" => "∤",
    r"\aleph" => "ℵ",
    r"\hbar" => "ℏ",
    r"\ell" => "ℓ",
    r"\Re" => "ℜ",
    r"\Im" => "ℑ",
    r"\wp" => "℘",

    // Spacing commands
    r"\quad" => "  ",
    r"\qquad" => "    ",
    r"\," => " ",
    r"\;" => " ",
    r"\:" => " ",
    r"\ " => " ",
    r"\!" => "",

    // Escaped characters
    r"\$" => "$",
    r"\%" => "%",
    r"\&" => "&",
    r"\#" => "#",
    r"\_" => "_",
    r"\{" => "{",
    r"\}" => "}",
};

/// Named math functions rendered as upright literal text (`\sin` → "sin").
///
/// Keys are the bare command words. A match only counts when the command word
/// is not a prefix of a longer identifier, which the compiler guarantees by
/// extracting maximal letter runs.
pub static FUNCTION_NAMES: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh", "coth",
    "log", "ln", "exp",
    "min", "max", "sup", "inf",
    "det", "gcd", "lcm", "deg", "arg",
    "ker", "dim", "hom", "mod", "Pr",
};

/// Look up a LaTeX command (including the leading backslash).
pub fn lookup(command: &str) -> Option<&'static str> {
    SYMBOLS.get(command).copied()
}

/// Whether a bare command word names a math function (`sin`, `log`, ...).
pub fn is_function_name(word: &str) -> bool {
    FUNCTION_NAMES.contains(word)
}
