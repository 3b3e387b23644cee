//! Lead scoring.
//!
//! A lead's score is a 0-100 completeness heuristic: contact fields earn a
//! fixed number of points and the free-text challenges field earns more the
//! longer it is. The tiers are cumulative, so a 120-character description
//! collects all three.

use crate::models::Lead;

pub const MAX_SCORE: u8 = 100;

const NAME_POINTS: u32 = 20;
const EMAIL_POINTS: u32 = 20;
const PHONE_POINTS: u32 = 15;
const BUSINESS_POINTS: u32 = 20;

/// (minimum length, exclusive) -> points
const CHALLENGE_TIERS: [(usize, u32); 3] = [(10, 10), (50, 10), (100, 5)];

/// Scores a lead. Missing fields contribute nothing; the sum is clamped at 100.
pub fn score_lead(lead: &Lead) -> u8 {
    let mut score = 0u32;

    if present(Some(&lead.name)) {
        score += NAME_POINTS;
    }
    if present(Some(&lead.email)) {
        score += EMAIL_POINTS;
    }
    if present(lead.phone.as_ref()) {
        score += PHONE_POINTS;
    }
    if present(lead.business.as_ref()) {
        score += BUSINESS_POINTS;
    }

    score += challenge_points(lead.challenges.as_deref());

    score.min(MAX_SCORE as u32) as u8
}

fn challenge_points(challenges: Option<&str>) -> u32 {
    let len = challenges.map(|c| c.trim().chars().count()).unwrap_or(0);
    CHALLENGE_TIERS
        .iter()
        .filter(|(threshold, _)| len > *threshold)
        .map(|(_, points)| points)
        .sum()
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
