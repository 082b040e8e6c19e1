pub mod calendar_grid;
