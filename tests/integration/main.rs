//! Integration tests, run against an in-process fake catalog API

mod common;
