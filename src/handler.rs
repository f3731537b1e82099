use crate::{
    arguments::{Arguments, FromArgument},
    error::ArgumentError,
    resolution::Resolution,
};

/// Handler invoked once an outcome is recorded. Receives the resolution itself
/// so it can probe for the outcomes it cares about.
pub type ResolveHandler<'h, N, A, T> =
    Box<dyn FnMut(&Resolution<'h, N, A, T>) -> anyhow::Result<T> + 'h>;

/// Trait implemented by probe handlers, functions and closures that take the
/// recorded arguments positionally.
///
/// `Q` only exists to tell apart implementations for functions with different
/// amount of parameters, it never has to be named by the user.
///
/// * For tuple arguments `(T1, ..., Tn)` the handler is `FnOnce(T1, ..., Tn)`,
///   every element is cloned out of the record.
/// * For [`Arguments`] the handler is `FnOnce(T1, ..., Tn)` where every
///   parameter implements [`FromArgument`], the amount of recorded values has
///   to match the amount of parameters.
/// * A handler without parameters accepts any arguments and ignores them.
pub trait ProbeHandler<A, Q>: Sized {
    type Output;

    /// Calls handler's logic with recorded arguments.
    fn call(self, args: &A) -> Result<Self::Output, ArgumentError>;
}

impl<F, A, R> ProbeHandler<A, ()> for F
where
    F: FnOnce() -> R,
{
    type Output = R;

    fn call(self, _args: &A) -> Result<R, ArgumentError> {
        Ok(self())
    }
}

macro_rules! implement_probe_handler {
    ($count:expr; $($ty:ident => $index:tt),+) => {
        #[allow(non_snake_case)]
        impl<F, R, $($ty,)+> ProbeHandler<($($ty,)+), ($($ty,)+)> for F
        where
            $($ty: Clone,)+
            F: FnOnce($($ty,)+) -> R,
        {
            type Output = R;

            fn call(self, args: &($($ty,)+)) -> Result<R, ArgumentError> {
                Ok(self($(args.$index.clone(),)+))
            }
        }

        #[allow(non_snake_case)]
        impl<F, R, $($ty,)+> ProbeHandler<Arguments, (Arguments, $($ty,)+)> for F
        where
            $($ty: FromArgument,)+
            F: FnOnce($($ty,)+) -> R,
        {
            type Output = R;

            fn call(self, args: &Arguments) -> Result<R, ArgumentError> {
                args.expect_len($count)?;
                Ok(self($(args.get::<$ty>($index)?,)+))
            }
        }
    };
}

implement_probe_handler!(1; T1 => 0);
implement_probe_handler!(2; T1 => 0, T2 => 1);
implement_probe_handler!(3; T1 => 0, T2 => 1, T3 => 2);
implement_probe_handler!(4; T1 => 0, T2 => 1, T3 => 2, T4 => 3);
implement_probe_handler!(5; T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4);
implement_probe_handler!(6; T1 => 0, T2 => 1, T3 => 2, T4 => 3, T5 => 4, T6 => 5);
