//! Shared constants for end-to-end tests
//!
//! When the seeded catalog or the test accounts change, update only this file.

// ============================================================================
// Test Accounts
// ============================================================================

pub const TEST_USER_EMAIL: &str = "listener@example.com";
pub const TEST_USER_NAME: &str = "Listener";
pub const TEST_USER_PASS: &str = "testpass123";

pub const OTHER_USER_EMAIL: &str = "other@example.com";

// ============================================================================
// Seeded Catalog
// ============================================================================

/// (id, title, artist, year). Ids sort in the listed order.
pub const CATALOG_TRACKS: &[(&str, &str, &str, i64)] = &[
    ("track-01", "1904", "The Tallest Man on Earth", 2012),
    ("track-02", "Love Story", "Taylor Swift", 2008),
    ("track-03", "Cardigan", "Taylor Swift", 2020),
    ("track-04", "Bad Blood", "Taylor Swift", 2014),
    ("track-05", "Yellow Submarine", "The Beatles", 1966),
    ("track-06", "Let It Be", "The Beatles", 1970),
    ("track-07", "Help!", "The Beatles", 1965),
    ("track-08", "Love Me Do", "The Beatles", 1962),
    ("track-09", "Bohemian Rhapsody", "Queen", 1975),
    ("track-10", "Love of My Life", "Queen", 1975),
    ("track-11", "Somebody to Love", "Queen", 1976),
    ("track-12", "Blank Space", "Taylor Swift", 2014),
];

pub const LOVE_STORY_ID: &str = "track-02";
pub const BAD_BLOOD_ID: &str = "track-04";
pub const YELLOW_SUBMARINE_ID: &str = "track-05";
pub const LOVE_ME_DO_ID: &str = "track-08";
pub const LOVE_OF_MY_LIFE_ID: &str = "track-10";
pub const BLANK_SPACE_ID: &str = "track-12";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
