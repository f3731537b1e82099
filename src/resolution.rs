use std::{fmt, sync::Arc};

use log::{debug, trace};

use crate::{
    arguments::Arguments,
    error::OutcomeError,
    handler::{ProbeHandler, ResolveHandler},
    set::{OutcomeName, OutcomeSet},
};

/// Outcome that occurred together with the arguments it was dispatched with.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord<N, A> {
    name: N,
    args: A,
}

impl<N, A> OutcomeRecord<N, A> {
    pub fn name(&self) -> &N {
        &self.name
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    pub fn into_parts(self) -> (N, A) {
        (self.name, self.args)
    }
}

/// Tracks a single dispatch. Records which outcome occurred and mediates
/// probes against it.
///
/// The resolution handler is called with the resolution itself right after
/// the outcome is recorded, probes made from inside of it (or later, on the
/// same resolution) fire only for the recorded outcome:
///
/// ```
/// use outcomes::{OutcomeSet, Resolution};
/// use std::sync::Arc;
///
/// let names = Arc::new(OutcomeSet::new(["success", "failure"]).unwrap());
/// let mut resolution = Resolution::new(names, |res: &Resolution<&str, (String,), String>| {
///     let mut reply = String::new();
///     res.probe(&"success", |body: String| reply = body)?;
///     res.probe(&"failure", |_: String| unreachable!())?;
///     Ok(reply)
/// });
///
/// let reply = resolution.record("success", ("ok".into(),)).unwrap();
/// assert_eq!(reply, "ok");
/// ```
///
/// Resolution is not meant to be shared between threads, `record` takes
/// `&mut self` so it can not run concurrently with probes on the same instance.
pub struct Resolution<'h, N, A = Arguments, T = ()> {
    names: Arc<OutcomeSet<N>>,

    /// Taken out for the duration of its own invocation.
    handler: Option<ResolveHandler<'h, N, A, T>>,

    record: Option<OutcomeRecord<N, A>>,
}

impl<'h, N, A, T> Resolution<'h, N, A, T>
where
    N: OutcomeName,
{
    /// Creates unresolved Resolution sharing given name set.
    pub fn new<H>(names: Arc<OutcomeSet<N>>, handler: H) -> Self
    where
        H: FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h,
    {
        Self {
            names,
            handler: Some(Box::new(handler)),
            record: None,
        }
    }

    /// Records outcome and calls the resolution handler with `self`.
    ///
    /// Fails with `InvalidOutcome` for undeclared names and with
    /// `AlreadyResolved` if an outcome was recorded before, in both cases
    /// the handler is not called. Errors returned by the handler are passed
    /// through untouched.
    pub fn record(&mut self, name: N, args: A) -> anyhow::Result<T> {
        self.names.validate(&name)?;

        if let Some(record) = &self.record {
            return Err(OutcomeError::AlreadyResolved {
                recorded: record.name.clone(),
                attempted: name,
            }
            .into());
        }

        debug!("Resolution::record - outcome {:?}", name);
        self.record = Some(OutcomeRecord { name, args });

        // only missing while it runs, and that can't overlap with `record`.
        let mut handler = self
            .handler
            .take()
            .ok_or(OutcomeError::<N>::MissingHandler)?;
        let result = handler(&*self);
        self.handler = Some(handler);

        result
    }

    /// Calls `handler` with recorded arguments if `name` is the outcome that
    /// occurred. Returns `Ok(None)` when the handler was not called, either
    /// because nothing was recorded yet or because another outcome was.
    ///
    /// Undeclared names are always rejected with `InvalidOutcome`.
    pub fn probe<Q, P>(&self, name: &N, handler: P) -> Result<Option<P::Output>, OutcomeError<N>>
    where
        P: ProbeHandler<A, Q>,
    {
        self.names.validate(name)?;

        match &self.record {
            Some(record) if &record.name == name => {
                trace!("Resolution::probe - {:?} fired", name);
                Ok(Some(handler.call(&record.args)?))
            }
            _ => {
                trace!("Resolution::probe - {:?} skipped", name);
                Ok(None)
            }
        }
    }

    /// Indicates if `name` is the recorded outcome without calling anything.
    pub fn matches(&self, name: &N) -> Result<bool, OutcomeError<N>> {
        self.names.validate(name)?;
        Ok(matches!(&self.record, Some(record) if &record.name == name))
    }

    /// Recorded outcome, `None` until `record` succeeds.
    pub fn outcome(&self) -> Option<&OutcomeRecord<N, A>> {
        self.record.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.record.is_some()
    }

    /// Declared names in declaration order.
    pub fn outcome_names(&self) -> Vec<N> {
        self.names.to_vec()
    }

    #[cfg(test)]
    pub(crate) fn names(&self) -> &Arc<OutcomeSet<N>> {
        &self.names
    }

    /// Resolution handler. `None` only while the handler itself is running.
    pub fn handler(&self) -> Option<&ResolveHandler<'h, N, A, T>> {
        self.handler.as_ref()
    }
}

impl<'h, N, A, T> fmt::Debug for Resolution<'h, N, A, T>
where
    N: fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("names", &self.names)
            .field("handler", &self.handler.as_ref().map(|_| "FnMut"))
            .field("record", &self.record)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn names() -> Arc<OutcomeSet<&'static str>> {
        Arc::new(OutcomeSet::new(["success", "failure"]).expect("valid set"))
    }

    #[test]
    fn test_record_calls_handler_once() -> anyhow::Result<()> {
        let calls = Cell::new(0);
        let mut resolution = Resolution::new(names(), |res: &Resolution<_, (i32, i32)>| {
            calls.set(calls.get() + 1);
            assert!(res.is_resolved());
            Ok(())
        });

        assert!(!resolution.is_resolved());
        resolution.record("success", (1, 2))?;

        assert_eq!(calls.get(), 1);
        assert_eq!(
            resolution.outcome().map(|r| (*r.name(), *r.args())),
            Some(("success", (1, 2)))
        );
        assert!(resolution.handler().is_some());
        Ok(())
    }

    #[test]
    fn test_invalid_record_does_not_call_handler() {
        let calls = Cell::new(0);
        let mut resolution = Resolution::new(names(), |_: &Resolution<_, ()>| {
            calls.set(calls.get() + 1);
            Ok(())
        });

        let err = resolution.record("timeout", ()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OutcomeError<&str>>(),
            Some(OutcomeError::InvalidOutcome("timeout"))
        ));
        assert_eq!(calls.get(), 0);
        assert!(resolution.outcome().is_none());
    }

    #[test]
    fn test_second_record_is_rejected() -> anyhow::Result<()> {
        let calls = Cell::new(0);
        let mut resolution = Resolution::new(names(), |_: &Resolution<_, ()>| {
            calls.set(calls.get() + 1);
            Ok(())
        });

        resolution.record("success", ())?;
        let err = resolution.record("failure", ()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OutcomeError<&str>>(),
            Some(OutcomeError::AlreadyResolved {
                recorded: "success",
                attempted: "failure"
            })
        ));
        assert_eq!(calls.get(), 1);
        assert_eq!(resolution.outcome().map(|r| *r.name()), Some("success"));
        Ok(())
    }

    #[test]
    fn test_probe_before_record() {
        let resolution = Resolution::new(names(), |_: &Resolution<_, ()>| Ok(()));

        assert!(matches!(resolution.probe(&"success", || ()), Ok(None)));
        assert!(matches!(
            resolution.probe(&"timeout", || ()),
            Err(OutcomeError::InvalidOutcome("timeout"))
        ));
    }

    #[test]
    fn test_probe_after_record() -> anyhow::Result<()> {
        let seen = RefCell::new(Vec::new());
        let mut resolution = Resolution::new(names(), |res: &Resolution<_, (String, u32)>| {
            res.probe(&"success", |body: String, code: u32| {
                seen.borrow_mut().push(format!("{} {}", code, body))
            })?;
            res.probe(&"failure", |_: String, _: u32| {
                seen.borrow_mut().push("failure".into())
            })?;
            Ok(())
        });

        resolution.record("success", ("ok".into(), 200))?;
        assert_eq!(*seen.borrow(), vec!["200 ok"]);

        let again = resolution.probe(&"success", |body: String, _: u32| body)?;
        assert_eq!(again.as_deref(), Some("ok"));
        assert_eq!(resolution.probe(&"failure", || "no")?, None);
        Ok(())
    }

    #[test]
    fn test_handler_error_is_passed_through() {
        #[derive(Debug, thiserror::Error)]
        #[error("upstream is down")]
        struct Upstream;

        let mut resolution = Resolution::new(names(), |_: &Resolution<_, ()>| Err(Upstream.into()));

        let err = resolution.record("failure", ()).unwrap_err();
        assert!(err.downcast_ref::<Upstream>().is_some());
        assert!(resolution.is_resolved());
    }
}
