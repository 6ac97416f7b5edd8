//! Data Transfer Objects
//!
//! Wire shapes of the build server's JSON API. They are decoded as-is and
//! then converted into the domain records that correlation works on.

pub mod remote;
