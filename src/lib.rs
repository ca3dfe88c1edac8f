pub mod constants;
pub mod error;
pub mod grdecl;
pub mod grid;
pub mod math_utils;
pub mod report;
