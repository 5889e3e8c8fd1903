pub mod column_repeater;

pub use column_repeater::ColumnRepeater;
