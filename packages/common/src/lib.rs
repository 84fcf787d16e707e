//! Common - Shared Types and Utilities for the Token Bridge Contracts
//!
//! This package provides the asset abstraction used by the bridge to move
//! tokens in and out of custody, regardless of whether a token is a native
//! bank denom or a CW20 contract.

pub mod asset;

pub use asset::AssetInfo;
