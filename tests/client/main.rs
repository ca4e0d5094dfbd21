//! Client Test Suite
//!
//! Query submission through the `faunadb` facade against a scripted
//! transport, plus configuration files on disk.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Queries** (escaping on the way out, decoding on the way back)
//! - **Tier 2: Transaction Time** (monotonic last-seen time across threads)
//! - **Tier 3: Server Errors** (status mapping and error entries)
//! - **Tier 4: Configuration** (TOML files, validation)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test client
//! ```

mod configuration;
mod queries;
mod server_errors;
mod txn_time;
