use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    arguments::Arguments,
    error::OutcomeError,
    handler::ResolveHandler,
    resolution::Resolution,
    set::{OutcomeName, OutcomeSet, Outcomes},
};

/// Declares which outcomes an operation may produce and dispatches exactly
/// one of them.
///
/// The resolution handler is given either at construction or at dispatch,
/// never both:
///
/// ```
/// use outcomes::{Dispatcher, Resolution};
///
/// let mut dispatcher = Dispatcher::new(["success", "failure"]).unwrap();
///
/// let code = dispatcher
///     .dispatch_with("failure", (503u16,), |res: &Resolution<&str, (u16,), u16>| {
///         Ok(res.probe(&"failure", |code: u16| code)?.unwrap_or(200))
///     })
///     .unwrap();
/// assert_eq!(code, 503);
/// ```
///
/// Dispatcher is single use: once an outcome is recorded further dispatches
/// fail with `AlreadyResolved`. It does no synchronization of its own.
pub struct Dispatcher<'h, N, A = Arguments, T = ()> {
    names: Arc<OutcomeSet<N>>,

    /// Created at construction when handler is given, otherwise at the
    /// first dispatch that brings one.
    resolution: Option<Resolution<'h, N, A, T>>,
}

impl<'h, N, A, T> Dispatcher<'h, N, A, T>
where
    N: OutcomeName,
{
    /// Creates dispatcher without handler, one has to be passed to
    /// `dispatch_with`. Fails with `EmptyOutcomeSet` if no names are given.
    pub fn new<I>(names: I) -> Result<Self, OutcomeError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        Ok(Self {
            names: Arc::new(OutcomeSet::new(names)?),
            resolution: None,
        })
    }

    /// Creates dispatcher together with its resolution.
    pub fn with_handler<I, H>(names: I, handler: H) -> Result<Self, OutcomeError<N>>
    where
        I: IntoIterator<Item = N>,
        H: FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h,
    {
        let mut dispatcher = Self::new(names)?;
        dispatcher.attach(handler);
        Ok(dispatcher)
    }

    /// Dispatches outcome to the handler given at construction.
    ///
    /// Fails with `MissingHandler` if there is none, everything else is
    /// described by [`Resolution::record`]. The handler is checked before the
    /// name, so an undeclared name on a dispatcher without handler fails with
    /// `MissingHandler`, not `InvalidOutcome`.
    pub fn dispatch(&mut self, name: N, args: A) -> anyhow::Result<T> {
        if self.resolution.is_none() {
            return Err(OutcomeError::<N>::MissingHandler.into());
        }
        self.names.validate(&name)?;

        self.resolve(name, args)
    }

    /// Dispatches outcome to `handler`. Fails with `DuplicateHandler` if a
    /// handler was given already, either at construction or by a previous
    /// dispatch.
    ///
    /// Nothing is attached when the name is not declared, so a rejected
    /// dispatch leaves the dispatcher as it was.
    pub fn dispatch_with<H>(&mut self, name: N, args: A, handler: H) -> anyhow::Result<T>
    where
        H: FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h,
    {
        if self.resolution.is_some() {
            return Err(OutcomeError::<N>::DuplicateHandler.into());
        }
        self.names.validate(&name)?;

        self.attach(handler);
        self.resolve(name, args)
    }

    fn attach<H>(&mut self, handler: H)
    where
        H: FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h,
    {
        debug!("Dispatcher::attach - handler for {:?}", self.names);
        self.resolution = Some(Resolution::new(self.names.clone(), handler));
    }

    fn resolve(&mut self, name: N, args: A) -> anyhow::Result<T> {
        let resolution = self
            .resolution
            .as_mut()
            .ok_or(OutcomeError::<N>::MissingHandler)?;

        debug!("Dispatcher::resolve - dispatching {:?}", name);
        resolution.record(name, args)
    }

    /// Handler of the resolution, `None` until one is attached. Never
    /// creates a resolution.
    pub fn active_handler(&self) -> Option<&ResolveHandler<'h, N, A, T>> {
        self.resolution.as_ref().and_then(Resolution::handler)
    }

    /// Resolution created for this dispatcher, if any.
    pub fn resolution(&self) -> Option<&Resolution<'h, N, A, T>> {
        self.resolution.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution
            .as_ref()
            .map_or(false, Resolution::is_resolved)
    }

    /// Declared names in declaration order.
    pub fn outcome_names(&self) -> Vec<N> {
        self.names.to_vec()
    }
}

impl<'h, N, A, T> Dispatcher<'h, N, A, T>
where
    N: Outcomes,
{
    /// Creates dispatcher declaring every variant of `N`.
    pub fn declared() -> Result<Self, OutcomeError<N>> {
        Self::new(N::declared())
    }

    /// Same as `declared`, with handler attached at construction.
    pub fn declared_with_handler<H>(handler: H) -> Result<Self, OutcomeError<N>>
    where
        H: FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h,
    {
        Self::with_handler(N::declared(), handler)
    }
}

impl<'h, N, A, T> fmt::Debug for Dispatcher<'h, N, A, T>
where
    N: fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("names", &self.names)
            .field("resolution", &self.resolution)
            .finish()
    }
}
