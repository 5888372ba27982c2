// CleanMod gateway: remote content moderation for submitted text.
//
// This is the library root. The moderation module talks to the CleanMod
// API; the filter module maps its decisions to publication states.

pub mod config;
pub mod filter;
pub mod moderation;
pub mod sanitize;
