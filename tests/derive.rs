use outcomes::{Dispatcher, OutcomeError, OutcomeSet, Outcomes, Resolution};
use std::cell::RefCell;
use tools::init_logger;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Outcomes)]
enum Post {
    Success,
    Failure,
    Timeout,
}

#[test]
fn test_declared_in_order() {
    assert_eq!(
        Post::declared(),
        vec![Post::Success, Post::Failure, Post::Timeout]
    );

    let set = OutcomeSet::<Post>::declared().expect("valid set");
    assert_eq!(set.len(), 3);
    assert!(set.contains(&Post::Timeout));
}

#[test]
fn test_enum_dispatcher() -> anyhow::Result<()> {
    init_logger();

    let seen = RefCell::new(Vec::new());
    let mut dispatcher = Dispatcher::<Post, (u32,)>::declared_with_handler(|res| {
        for outcome in res.outcome_names() {
            res.probe(&outcome, |code: u32| seen.borrow_mut().push((outcome, code)))?;
        }
        Ok(())
    })?;

    dispatcher.dispatch(Post::Timeout, (504,))?;
    drop(dispatcher);

    assert_eq!(seen.into_inner(), vec![(Post::Timeout, 504)]);
    Ok(())
}

#[test]
fn test_enum_dispatch_with() -> anyhow::Result<()> {
    init_logger();

    let mut dispatcher: Dispatcher<Post, (), bool> = Dispatcher::declared()?;
    let err = dispatcher.dispatch(Post::Success, ()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OutcomeError<Post>>(),
        Some(OutcomeError::MissingHandler)
    ));

    let failed = dispatcher.dispatch_with(Post::Failure, (), |res: &Resolution<Post, (), bool>| {
        res.matches(&Post::Failure).map_err(Into::into)
    });
    assert!(failed?);
    Ok(())
}
