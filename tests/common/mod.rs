#![allow(dead_code, unused_imports)]

pub use dagmake_test_utils::builders;
pub use dagmake_test_utils::fake_executor;
pub use dagmake_test_utils::{init_tracing, with_timeout};

use std::error::Error;

pub type TestResult = Result<(), Box<dyn Error>>;
