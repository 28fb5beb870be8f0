pub mod six_column;
