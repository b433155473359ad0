//! Big-O classification from extracted signals.

use std::fmt;

use crate::signals::Signals;

/// Complexity classes the heuristic engine can reason about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Complexity {
    /// Constant.
    Constant,
    /// Logarithmic. Scored, but never produced by [`classify`].
    Logarithmic,
    /// Linear.
    Linear,
    /// Quadratic.
    Quadratic,
    /// Exponential.
    Exponential,
}

impl Complexity {
    /// Big-O label as shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::Logarithmic => "O(log n)",
            Self::Linear => "O(n)",
            Self::Quadratic => "O(n²)",
            Self::Exponential => "O(2^n)",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated time and space complexity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ComplexityEstimate {
    /// Time complexity.
    pub time: Complexity,
    /// Space complexity.
    pub space: Complexity,
}

/// Classify complexity with a priority-ordered decision table; the first matching rule wins.
pub fn classify(signals: &Signals) -> ComplexityEstimate {
    let (time, space) = if signals.recursion && !signals.optimized_search {
        (Complexity::Exponential, Complexity::Linear)
    } else if signals.nested_loops {
        (Complexity::Quadratic, linear_if(signals.hash_map))
    } else if signals.has_loops() {
        (
            Complexity::Linear,
            linear_if(signals.hash_map || signals.array),
        )
    } else if signals.optimized_search {
        (Complexity::Linear, Complexity::Linear)
    } else {
        (Complexity::Constant, Complexity::Constant)
    };

    ComplexityEstimate { time, space }
}

fn linear_if(condition: bool) -> Complexity {
    if condition {
        Complexity::Linear
    } else {
        Complexity::Constant
    }
}
