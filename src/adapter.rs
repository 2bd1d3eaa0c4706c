//! Zero-copy adapters that turn higher-level containers into [`DataSource`]s.
//!
//! [`project`] pulls one numeric field out of a slice of aggregate records
//! (array-of-structs layouts), and [`flatten`] turns a multi-dimensional view
//! into the flat scalar sequence the binary section expects. Neither copies
//! the underlying data; both iterate it element by element at write time.

use crate::prelude::*;
use crate::source::write_elements;

/// Projects a single field out of a slice of aggregate records.
///
/// Constructed with [`project`]; the selector closure runs once per record
/// during the write.
pub struct FieldSource<'a, R, F> {
    records: &'a [R],
    field: F,
}

/// View one numeric field of every record in `records` as a flat sequence.
///
/// ```
/// use vtu::{adapter::project, DataSource};
///
/// struct Particle {
///     mass: f64,
///     charge: f64,
/// }
///
/// let particles = vec![
///     Particle { mass: 1.0, charge: -1.0 },
///     Particle { mass: 4.0, charge: 2.0 },
/// ];
///
/// let masses = project(&particles, |p| p.mass);
/// assert_eq!(masses.len(), 2);
/// assert_eq!(masses.size_bytes(), 16);
/// ```
pub fn project<'a, R, T, F>(records: &'a [R], field: F) -> FieldSource<'a, R, F>
where
    T: Numeric,
    F: Fn(&R) -> T,
{
    FieldSource { records, field }
}

impl<'a, R, T, F> DataSource for FieldSource<'a, R, F>
where
    T: Numeric,
    F: Fn(&R) -> T,
{
    fn len(&self) -> usize {
        self.records.len()
    }

    fn precision(&self) -> Precision {
        T::as_precision()
    }

    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        write_elements(self.records.iter().map(|r| (self.field)(r)), sink)
    }
}

/// Random access into a sequence of fixed-width tuples.
///
/// This is the capability the flattening adapter needs from an external
/// multi-dimensional container: how many tuples there are, how wide each one
/// is, and the value at `(tuple, component)`. Storage does not have to be
/// contiguous; sliced or tiled layouts only need to answer `get`.
///
/// Implementations for [`ndarray::ArrayView1`] (one scalar per element) and
/// [`ndarray::ArrayView2`] (one fixed-width tuple per element, rows are
/// tuples) are provided. Out-of-range indices panic, as ndarray indexing
/// does.
pub trait TupleView {
    type Elem: Numeric;

    /// number of tuples in the sequence
    fn tuples(&self) -> usize;

    /// scalar components per tuple
    fn components(&self) -> usize;

    fn get(&self, tuple: usize, component: usize) -> Self::Elem;
}

impl<'a, T> TupleView for ndarray::ArrayView1<'a, T>
where
    T: Numeric,
{
    type Elem = T;

    fn tuples(&self) -> usize {
        self.len()
    }

    fn components(&self) -> usize {
        1
    }

    fn get(&self, tuple: usize, _component: usize) -> T {
        self[tuple]
    }
}

impl<'a, T> TupleView for ndarray::ArrayView2<'a, T>
where
    T: Numeric,
{
    type Elem = T;

    fn tuples(&self) -> usize {
        self.nrows()
    }

    fn components(&self) -> usize {
        self.ncols()
    }

    fn get(&self, tuple: usize, component: usize) -> T {
        self[[tuple, component]]
    }
}

/// [`DataSource`] over a [`TupleView`], flattened in tuple-major order.
///
/// Logical flat index `i` reads component `i % components` of tuple
/// `i / components`.
#[derive(Constructor)]
pub struct FlatSource<V>(V);

/// Flatten a multi-dimensional view into the scalar sequence the binary
/// section expects.
pub fn flatten<V: TupleView>(view: V) -> FlatSource<V> {
    FlatSource(view)
}

impl<V> FlatSource<V>
where
    V: TupleView,
{
    /// component count to pass along when registering this source as
    /// point or cell data
    pub fn components(&self) -> usize {
        self.0.components()
    }
}

impl<V> DataSource for FlatSource<V>
where
    V: TupleView,
{
    fn len(&self) -> usize {
        self.0.tuples() * self.0.components()
    }

    fn precision(&self) -> Precision {
        V::Elem::as_precision()
    }

    fn write_to(&self, sink: &mut dyn Write) -> std::io::Result<()> {
        let components = self.0.components();
        let total = self.0.tuples() * components;

        write_elements(
            (0..total).map(|i| self.0.get(i / components, i % components)),
            sink,
        )
    }
}
