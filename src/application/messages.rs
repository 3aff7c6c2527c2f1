//! Assistant guidance text shown after each transition.

use crate::domain::Factorization;

pub const WELCOME: &str = "Welcome! Enter a number to start.";
pub const RESET: &str = "Welcome back! Enter a new number to start.";
pub const INVALID_INPUT: &str = "Please enter an integer greater than 1.";
pub const CHOOSE_PAIR: &str = "Great! Now choose how you want to split this number.";
pub const LEARN_MORE: &str = "Coming soon: a detailed explanation of why the fundamental \
theorem of arithmetic matters!";

pub fn prime_number(value: u64) -> String {
    format!("{value} is a prime number. Try a composite number such as 12, 36 or 72.")
}

pub fn prime_notice(value: u64) -> String {
    format!("{value} is a prime number! It cannot be decomposed.")
}

pub fn tree_created(value: u64) -> String {
    format!("New tree created for {value}. Click a composite bubble to decompose it.")
}

pub fn decomposed(value: u64, left: u64, right: u64) -> String {
    format!("{value} = {left} × {right}. Keep going until every bubble is prime.")
}

pub fn prime_clicked(value: u64) -> String {
    format!(
        "{value} is PRIME! It is a fundamental building block of mathematics. \
It cannot be decomposed any further."
    )
}

pub fn tree_completed(result: &Factorization) -> String {
    format!(
        "Tree complete: {}. The final result is always the same. \
That is the fundamental theorem of arithmetic!",
        result.compact()
    )
}
