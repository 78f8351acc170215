//! Collision-free plot number assignment.
//!
//! Candidates are numbered in detection order (largest area first). A
//! recognized label wins unless some earlier candidate already claimed it;
//! everything else falls back to a sequential counter. The counter is kept
//! ahead of every accepted numeric label so fallback numbers can never
//! collide with a label seen earlier in the batch.

use std::collections::HashSet;

/// A plot number chosen for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedNumber {
    pub number: String,
    /// True when the sequential counter supplied the number.
    pub fallback: bool,
}

/// Request-scoped numbering state. Never shared between requests.
#[derive(Debug)]
pub struct NumberAssigner {
    used: HashSet<String>,
    next_fallback: u32,
}

impl NumberAssigner {
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
            next_fallback: 1,
        }
    }

    /// Picks the number for the next candidate in detection order.
    pub fn assign(&mut self, recognized: Option<&str>) -> AssignedNumber {
        if let Some(label) = recognized {
            if !self.used.contains(label) {
                self.used.insert(label.to_string());
                match label.parse::<u32>() {
                    // Keep the counter ahead of every accepted numeric label.
                    Ok(value) if value >= self.next_fallback => {
                        self.next_fallback = value.saturating_add(1);
                    }
                    Ok(_) => {}
                    // An accepted label that does not parse as a number still
                    // advances the counter by one, unlike a duplicate label.
                    // Deliberate asymmetry; see DESIGN.md.
                    Err(_) => self.next_fallback += 1,
                }
                return AssignedNumber {
                    number: label.to_string(),
                    fallback: false,
                };
            }
        }
        let number = format!("{:03}", self.next_fallback);
        self.next_fallback += 1;
        self.used.insert(number.clone());
        AssignedNumber {
            number,
            fallback: true,
        }
    }
}

impl Default for NumberAssigner {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers a whole batch, one entry per recognition result, in input order.
pub fn assign_numbers(recognized: &[Option<String>]) -> Vec<AssignedNumber> {
    let mut assigner = NumberAssigner::new();
    recognized
        .iter()
        .map(|r| assigner.assign(r.as_deref()))
        .collect()
}
