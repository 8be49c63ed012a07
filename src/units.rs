//! Newtypes distinguishing logical cell counts from buffer extents.

/// Logical cells along the x axis.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
/// Logical cells along the y axis.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

/// Rows in the wall/passage buffer, `2 * height + 1`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowsCount(pub usize);
/// Columns in the wall/passage buffer, `2 * width + 1`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnsCount(pub usize);

impl From<Height> for RowsCount {
    fn from(height: Height) -> RowsCount {
        RowsCount(2 * height.0 + 1)
    }
}

impl From<Width> for ColumnsCount {
    fn from(width: Width) -> ColumnsCount {
        ColumnsCount(2 * width.0 + 1)
    }
}
