//! Excuse table for simulated unavailability
//!
//! Each excuse carries its own duration range and the family of lines the
//! persona uses when she comes back from it.

use sakhi_core::ExcuseCategory;

/// One way of being busy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excuse {
    /// Category
    pub category: ExcuseCategory,
    /// Reason text, quoted verbatim in every reply of the window
    pub reason: &'static str,
    /// Shortest absence in minutes
    pub min_minutes: u32,
    /// Longest absence in minutes
    pub max_minutes: u32,
    /// Lines that open the first reply after the window elapses
    pub return_lines: &'static [&'static str],
}

/// Every excuse, grouped by category
pub static EXCUSES: &[Excuse] = &[
    Excuse {
        category: ExcuseCategory::Work,
        reason: "in a meeting",
        min_minutes: 10,
        max_minutes: 30,
        return_lines: &[
            "meeting khatam finally, that was so long",
            "okay back, that meeting could've been an email",
        ],
    },
    Excuse {
        category: ExcuseCategory::Work,
        reason: "on a tight deadline",
        min_minutes: 5,
        max_minutes: 20,
        return_lines: &[
            "deadline done!! i'm alive again",
            "submitted it, finally free",
        ],
    },
    Excuse {
        category: ExcuseCategory::Work,
        reason: "stuck on a client call",
        min_minutes: 10,
        max_minutes: 25,
        return_lines: &[
            "client call over, my brain is fried",
            "okay the call is done, sorry sorry",
        ],
    },
    Excuse {
        category: ExcuseCategory::Health,
        reason: "having a really bad headache",
        min_minutes: 15,
        max_minutes: 40,
        return_lines: &[
            "headache is a little better now",
            "took a pill and lay down, feeling better",
        ],
    },
    Excuse {
        category: ExcuseCategory::Health,
        reason: "feeling feverish, lying down for a bit",
        min_minutes: 20,
        max_minutes: 60,
        return_lines: &[
            "woke up, fever's down a bit",
            "okay slept it off, still a little weak",
        ],
    },
    Excuse {
        category: ExcuseCategory::Personal,
        reason: "helping mummy in the kitchen",
        min_minutes: 10,
        max_minutes: 25,
        return_lines: &[
            "escaped the kitchen finally",
            "back, mummy made me chop onions for ages",
        ],
    },
    Excuse {
        category: ExcuseCategory::Personal,
        reason: "out grocery shopping",
        min_minutes: 15,
        max_minutes: 30,
        return_lines: &[
            "home now, bought way too many snacks",
            "back from the market, it was so crowded",
        ],
    },
    Excuse {
        category: ExcuseCategory::Personal,
        reason: "cousins just showed up at home",
        min_minutes: 20,
        max_minutes: 45,
        return_lines: &[
            "cousins finally left, i'm free",
            "okay the family chaos is over",
        ],
    },
];

/// Excuses in a category, in table order
pub fn excuses_in(category: ExcuseCategory) -> Vec<&'static Excuse> {
    EXCUSES.iter().filter(|e| e.category == category).collect()
}

/// Look up an excuse by its reason text
pub fn find_excuse(reason: &str) -> Option<&'static Excuse> {
    EXCUSES.iter().find(|e| e.reason == reason)
}

/// Vague promise to come back, scaled by how long she'll be gone
pub fn vague_return_phrase(duration_minutes: u32) -> &'static str {
    match duration_minutes {
        0..=10 => "brb in a bit",
        11..=30 => "will text you in a while",
        _ => "talk later okay?",
    }
}

/// Fallback return line for windows whose excuse is no longer in the table
pub const GENERIC_RETURN_LINE: &str = "okay i'm back, sorry for disappearing";
