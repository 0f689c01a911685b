//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous operation selected by its `Args` type.
///
/// Queries, commands and infrastructure calls are all expressed as
/// [`Handler`]s, so a single type may serve many operations, each one picked
/// by the type of the arguments it is executed with.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
