//! SEPTA Regional Rail watcher.
//!
//! Shows the next regional rail trains between two stations, using the
//! SEPTA public JSON API, in a small web page that can refresh itself.

pub mod dump;
pub mod septa;
pub mod shell;
pub mod stations;
pub mod web;
