// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::derivation::{Derivation, Memoized};
use crate::filter_spec::FilterSpec;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use syncflux_core::DistinctUntilChangedExt;

enum Input<T> {
    Data(Option<T>),
    Filter(FilterSpec),
}

struct Latest<T, D: Derivation<T>> {
    data: Option<Option<T>>,
    filter: Option<FilterSpec>,
    memo: Memoized<T, D>,
}

/// Combines a payload stream and a filter stream into a stream of view models.
///
/// Nothing is emitted until both inputs have produced a value. After that,
/// every input change re-derives through a [`Memoized`] cache and only views
/// that differ from the previous emission are yielded. The stream ends once
/// both inputs have ended.
///
/// Store subscriptions deliver their current value first, so wiring two of
/// them here emits the initial view immediately.
pub fn derived_view<T, D, DS, FS>(
    data: DS,
    filters: FS,
    derivation: D,
) -> impl Stream<Item = D::View>
where
    T: Clone + PartialEq,
    D: Derivation<T>,
    DS: Stream<Item = Option<T>>,
    FS: Stream<Item = FilterSpec>,
{
    let inputs = stream::select(data.map(Input::Data), filters.map(Input::Filter));
    let latest = Latest {
        data: None,
        filter: None,
        memo: Memoized::new(derivation),
    };

    inputs
        .scan(latest, |latest, input| {
            match input {
                Input::Data(data) => latest.data = Some(data),
                Input::Filter(filter) => latest.filter = Some(filter),
            }
            let view = match (&latest.data, &latest.filter) {
                (Some(data), Some(filter)) => Some(latest.memo.view(data.as_ref(), filter)),
                _ => None,
            };
            future::ready(Some(view))
        })
        .filter_map(future::ready)
        .distinct_until_changed()
}
