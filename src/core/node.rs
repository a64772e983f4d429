//! Math equation tree
//!
//! The compiler's output unit: a tree of typed math primitives that maps
//! one-to-one onto native OMML equation structures. Every variant owns its
//! children; only [`MathNode::Run`] carries raw text.

/// Bar placement for overline/underline accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPosition {
    Top,
    Bottom,
}

/// One node of a compiled equation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MathNode {
    /// Literal glyphs and operators.
    Run(String),
    /// `\frac{num}{den}` and friends.
    Fraction {
        numerator: Vec<MathNode>,
        denominator: Vec<MathNode>,
    },
    /// `\sqrt{content}` or `\sqrt[degree]{content}`.
    Radical {
        content: Vec<MathNode>,
        degree: Option<Vec<MathNode>>,
    },
    /// `base^{superscript}`.
    SuperScript {
        base: Vec<MathNode>,
        superscript: Vec<MathNode>,
    },
    /// `base_{subscript}`.
    SubScript {
        base: Vec<MathNode>,
        subscript: Vec<MathNode>,
    },
    /// `base_{sub}^{super}`.
    SubSuperScript {
        base: Vec<MathNode>,
        subscript: Vec<MathNode>,
        superscript: Vec<MathNode>,
    },
    /// Overline/underline accent over a nested sequence.
    Bar {
        position: BarPosition,
        content: Vec<MathNode>,
    },
}

impl MathNode {
    /// Convenience constructor for a literal run.
    pub fn run(text: impl Into<String>) -> Self {
        MathNode::Run(text.into())
    }
}
