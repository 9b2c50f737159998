//! Shared test harness modules for the Sunspot CLI.

use super::*;

mod helpers;
mod steps;
