pub mod activity;
pub mod case;
pub mod case_event;
pub mod case_note;
pub mod custody;
pub mod evidence;
pub mod hearing;
pub mod party;
pub mod user;
