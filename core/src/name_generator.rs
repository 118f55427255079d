//! Deterministic subscriber names and contact details for demo data.

use crate::rng::SeedRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn first_name(rng: &mut SeedRng) -> &'static str {
        *rng.pick(FIRST_NAMES)
    }

    pub fn last_name(rng: &mut SeedRng) -> &'static str {
        *rng.pick(LAST_NAMES)
    }

    pub fn email(first: &str, last: &str, customer_id: &str) -> String {
        let suffix = &customer_id[customer_id.len().saturating_sub(4)..];
        format!(
            "{}.{}{}@example.net",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase(),
            suffix
        )
    }

    pub fn phone(rng: &mut SeedRng) -> String {
        format!(
            "555-{:03}-{:04}",
            rng.next_u64_below(1_000),
            rng.next_u64_below(10_000)
        )
    }

    pub fn address(rng: &mut SeedRng) -> String {
        format!(
            "{} {} {}",
            100 + rng.next_u64_below(9_900),
            rng.pick(STREETS),
            rng.pick(STREET_KINDS)
        )
    }
}

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda",
    "David", "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Carlos", "Karen", "Daniel", "Lisa", "Wei", "Nancy",
    "Aisha", "Sandra", "Mohammed", "Ashley", "Hiroshi", "Emily", "Diego", "Priya",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
    "Nguyen", "Patel", "Kim", "Chen", "Okafor", "Haddad", "Kowalski", "Tanaka",
];

const STREETS: &[&str] = &[
    "Oak", "Maple", "Cedar", "Pine", "Elm", "Willow", "Birch", "Lake",
    "Hill", "Park", "Ridge", "River", "Sunset", "Meadow", "Forest", "Highland",
];

const STREET_KINDS: &[&str] = &["St", "Ave", "Rd", "Ln", "Dr", "Ct"];
