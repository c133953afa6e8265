//! Static recommendations served whenever generated output is unusable.
//!
//! These are long-running national programs with stable landing pages, so the
//! set stays meaningful across years. Deadlines are the programs' usual windows.

use crate::models::scholarship::{ScholarshipRecommendation, ScholarshipSet};

struct Entry {
    number: u32,
    title: &'static str,
    due_date: &'static str,
    award_amount: &'static str,
    eligibility: &'static str,
    apply_link: &'static str,
    gpa: &'static str,
    university: &'static str,
}

const PRIMARY: &[Entry] = &[
    Entry {
        number: 1,
        title: "Coca-Cola Scholars Program",
        due_date: "September 30",
        award_amount: "$20,000",
        eligibility: "High school seniors in the U.S. demonstrating leadership and service",
        apply_link: "https://www.coca-colascholarsfoundation.org/apply/",
        gpa: "3.0",
        university: "Any accredited U.S. college",
    },
    Entry {
        number: 2,
        title: "Jackie Robinson Foundation Scholarship",
        due_date: "January 10",
        award_amount: "$30,000",
        eligibility: "Minority high school seniors with financial need and leadership potential",
        apply_link: "https://jackierobinson.org/apply/",
        gpa: "3.0",
        university: "Any accredited four-year U.S. college",
    },
    Entry {
        number: 3,
        title: "Society of Women Engineers Scholarship",
        due_date: "February 15",
        award_amount: "$1,000 - $15,000",
        eligibility: "Women pursuing ABET-accredited engineering or computer science degrees",
        apply_link: "https://swe.org/scholarships/",
        gpa: "3.0",
        university: "Any ABET-accredited program",
    },
    Entry {
        number: 4,
        title: "Hispanic Scholarship Fund",
        due_date: "February 15",
        award_amount: "$500 - $5,000",
        eligibility: "Students of Hispanic heritage enrolled full-time",
        apply_link: "https://www.hsf.net/scholarship",
        gpa: "3.0",
        university: "Any accredited U.S. college",
    },
    Entry {
        number: 5,
        title: "UNCF General Scholarship",
        due_date: "Rolling",
        award_amount: "$2,000 - $10,000",
        eligibility: "African American students with financial need",
        apply_link: "https://uncf.org/scholarships",
        gpa: "2.5",
        university: "Any accredited U.S. college",
    },
];

const OVERLAPPING: &[Entry] = &[
    Entry {
        number: 1,
        title: "Jackie Robinson Foundation Scholarship",
        due_date: "January 10",
        award_amount: "$30,000",
        eligibility: "Minority high school seniors with financial need and leadership potential",
        apply_link: "https://jackierobinson.org/apply/",
        gpa: "3.0",
        university: "Any accredited four-year U.S. college",
    },
    Entry {
        number: 2,
        title: "Society of Women Engineers Scholarship",
        due_date: "February 15",
        award_amount: "$1,000 - $15,000",
        eligibility: "Women pursuing ABET-accredited engineering or computer science degrees",
        apply_link: "https://swe.org/scholarships/",
        gpa: "3.0",
        university: "Any ABET-accredited program",
    },
    Entry {
        number: 3,
        title: "UNCF General Scholarship",
        due_date: "Rolling",
        award_amount: "$2,000 - $10,000",
        eligibility: "African American students with financial need",
        apply_link: "https://uncf.org/scholarships",
        gpa: "2.5",
        university: "Any accredited U.S. college",
    },
];

/// The fixed fallback set. Always non-empty in both collections.
pub fn fallback_set() -> ScholarshipSet {
    ScholarshipSet {
        primary: PRIMARY.iter().map(to_recommendation).collect(),
        overlapping: OVERLAPPING.iter().map(to_recommendation).collect(),
    }
}

fn to_recommendation(entry: &Entry) -> ScholarshipRecommendation {
    ScholarshipRecommendation {
        number: Some(entry.number),
        title: entry.title.to_string(),
        due_date: entry.due_date.to_string(),
        award_amount: entry.award_amount.to_string(),
        eligibility: entry.eligibility.to_string(),
        apply_link: entry.apply_link.to_string(),
        gpa: entry.gpa.to_string(),
        university: entry.university.to_string(),
    }
}
