#![cfg(test)]

//! Unit-test logging hook; the subscriber itself lives in
//! `backend-test-support` so integration suites share it.

pub fn init() {
    backend_test_support::logging::init();
}
