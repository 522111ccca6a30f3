// In-crate test suite, driven by a scripted ledger double

pub mod mock_ledger;

mod codec_tests;
mod index_tests;
