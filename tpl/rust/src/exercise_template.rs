//! [__PROBLEM_ID__] __PROBLEM_TITLE__
//!
//! Difficulty: __PROBLEM_DIFFICULTY__

#![allow(dead_code)]

use crate::Solution;

__PROBLEM_DEFAULT_CODE__
