//! The filtration core: coboundary enumeration, the dimension-0 union-find
//! sweep, and the ℤ/2 coboundary-matrix reduction.

pub mod coboundary;
pub mod link_find;
pub mod reduction;
pub mod union_find;

pub use coboundary::Cofaces;
pub use reduction::ColumnReduction;
pub use union_find::UnionFind;
