//! Global vertex ordering: a strict total order by (value, vertex id).
//!
//! Every later stage compares vertices by sort index only, so duplicate field
//! values (plateaus, constant fields) are broken consistently by vertex id and
//! the scalar values are never consulted again.

use crate::algs::executor::Executor;
use std::cmp::Ordering;

/// Field values that admit a total order.
///
/// Floats use IEEE 754 `totalOrder`, so `NaN` sorts above every number
/// instead of poisoning the comparison.
pub trait ScalarValue: Copy + Send + Sync {
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_scalar_ord {
    ($($t:ty),*) => {
        $(impl ScalarValue for $t {
            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }
        })*
    };
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {
        $(impl ScalarValue for $t {
            #[inline]
            fn total_cmp(&self, other: &Self) -> Ordering {
                <$t>::total_cmp(self, other)
            }
        })*
    };
}

impl_scalar_ord!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_scalar_float!(f32, f64);

/// The sort order (rank → vertex) and its inverse (vertex → rank).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    order: Vec<usize>,
    index: Vec<usize>,
}

impl SortOrder {
    /// Sort vertices ascending by value, ties broken by vertex id.
    pub fn compute<T, E>(values: &[T], exec: &E) -> Self
    where
        T: ScalarValue,
        E: Executor,
    {
        let n = values.len();
        let mut order: Vec<usize> = (0..n).collect();
        // The id tie-break makes the key unique, so an unstable sort is deterministic.
        exec.sort_by_key(&mut order, |&v| VertexKey { value: values[v], vertex: v });
        let index = invert(&order, exec);
        Self { order, index }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Vertex ids in ascending order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Rank of every vertex.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    #[inline]
    pub fn vertex(&self, rank: usize) -> usize {
        self.order[rank]
    }

    #[inline]
    pub fn rank(&self, vertex: usize) -> usize {
        self.index[vertex]
    }
}

/// Scatter `order` into its inverse permutation.
fn invert<E: Executor>(order: &[usize], exec: &E) -> Vec<usize> {
    let mut index = vec![0usize; order.len()];
    // Each rank lands in its own slot; pairs are built in parallel, scattered serially.
    let pairs = exec.map_indices(order.len(), |rank| (order[rank], rank));
    for (vertex, rank) in pairs {
        index[vertex] = rank;
    }
    index
}

#[derive(Clone, Copy)]
struct VertexKey<T> {
    value: T,
    vertex: usize,
}

impl<T: ScalarValue> PartialEq for VertexKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: ScalarValue> Eq for VertexKey<T> {}

impl<T: ScalarValue> PartialOrd for VertexKey<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ScalarValue> Ord for VertexKey<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.vertex.cmp(&other.vertex))
    }
}
