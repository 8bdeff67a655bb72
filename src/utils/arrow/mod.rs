//! Arrow data handling utilities

pub mod array_utils;

pub use array_utils::{
    downcast_array, get_column_by_name, get_column_index, int64_column_or_null,
    string_column_or_null,
};
