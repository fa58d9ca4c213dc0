// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::filter_spec::FilterSpec;

/// Pure projection of a payload and a filter into a view model.
///
/// Implementations must be deterministic and must return a well-formed empty
/// view when `data` is `None`, for every filter.
pub trait Derivation<T> {
    type View: Clone + PartialEq;

    fn derive(&self, data: Option<&T>, filter: &FilterSpec) -> Self::View;
}

impl<T, D: Derivation<T> + ?Sized> Derivation<T> for &D {
    type View = D::View;

    fn derive(&self, data: Option<&T>, filter: &FilterSpec) -> Self::View {
        (**self).derive(data, filter)
    }
}

/// Caches the last view of a [`Derivation`].
///
/// The view is recomputed only when the payload or the filter differs
/// structurally from the inputs of the cached view.
///
/// ```
/// use syncflux_view::{Derivation, FilterSpec, Memoized};
///
/// struct Count;
///
/// impl Derivation<Vec<u32>> for Count {
///     type View = usize;
///
///     fn derive(&self, data: Option<&Vec<u32>>, _filter: &FilterSpec) -> usize {
///         data.map_or(0, Vec::len)
///     }
/// }
///
/// let mut memo = Memoized::new(Count);
/// let data = vec![1, 2, 3];
/// let filter = FilterSpec::new();
///
/// assert_eq!(memo.view(Some(&data), &filter), 3);
/// assert_eq!(memo.view(Some(&data), &filter), 3);
/// assert_eq!(memo.recomputations(), 1);
/// ```
pub struct Memoized<T, D: Derivation<T>> {
    derivation: D,
    cached: Option<Cached<T, D::View>>,
    recomputations: u64,
}

struct Cached<T, V> {
    data: Option<T>,
    filter: FilterSpec,
    view: V,
}

impl<T, D> Memoized<T, D>
where
    T: Clone + PartialEq,
    D: Derivation<T>,
{
    pub fn new(derivation: D) -> Self {
        Self {
            derivation,
            cached: None,
            recomputations: 0,
        }
    }

    /// Returns the view for the given inputs, recomputing only if they changed.
    pub fn view(&mut self, data: Option<&T>, filter: &FilterSpec) -> D::View {
        if let Some(cached) = &self.cached {
            if cached.data.as_ref() == data && cached.filter == *filter {
                return cached.view.clone();
            }
        }

        let view = self.derivation.derive(data, filter);
        self.recomputations += 1;
        tracing::trace!(recomputations = self.recomputations, "view recomputed");
        self.cached = Some(Cached {
            data: data.cloned(),
            filter: filter.clone(),
            view: view.clone(),
        });
        view
    }

    /// Number of times the derivation actually ran.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Drops the cached view; the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
