use domains::errors::DomainError;
use domains::models::{Caller, PostEdit};
use domains::ports::PostRepository;
use integration_tests::{memory_harness, registration, snapshot};
use uuid::Uuid;

#[tokio::test]
async fn edit_preserves_unset_field() {
    let h = memory_harness().await;
    h.engine.register(registration("alice")).await.unwrap();
    let post = h
        .engine
        .create_post("T".into(), "C".into(), "alice")
        .await
        .unwrap();

    let edit = PostEdit {
        title: Some("T2".into()),
        content: None,
    };
    let edited = h.engine.edit_post(post.id, "alice", edit).await.unwrap();

    assert_eq!(edited.title, "T2");
    assert_eq!(edited.content, "C");
    let stored = h.store.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "T2");
    assert_eq!(stored.content, "C");
}

#[tokio::test]
async fn create_returns_the_new_post_directly() {
    let h = memory_harness().await;
    let first = h.user_with_post("alice").await;
    let second = h
        .engine
        .create_post("second".into(), "body".into(), "alice")
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    let listed = h.engine.list_user_posts("alice").await.unwrap();
    assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn locked_user_mutations_fail_and_change_nothing() {
    let h = memory_harness().await;
    let post = h.user_with_post("alice").await;
    let comment = h
        .engine
        .comment_on_post(post.id, "hi".into(), "alice")
        .await
        .unwrap();
    h.engine.logout("alice").await.unwrap();
    let before = snapshot(h.store.as_ref()).await;

    let edit = PostEdit {
        title: Some("nope".into()),
        content: Some("nope".into()),
    };
    let attempts = [
        h.engine
            .create_post("T".into(), "C".into(), "alice")
            .await
            .map(|_| ()),
        h.engine.edit_post(post.id, "alice", edit).await.map(|_| ()),
        h.engine.delete_post(post.id, "alice").await.map(|_| ()),
        h.engine
            .comment_on_post(post.id, "again".into(), "alice")
            .await
            .map(|_| ()),
        h.engine
            .delete_comment_in_post(post.id, comment.id, "alice")
            .await
            .map(|_| ()),
    ];
    for attempt in attempts {
        assert!(matches!(attempt, Err(DomainError::SessionLocked(_))), "{attempt:?}");
    }

    assert_eq!(snapshot(h.store.as_ref()).await, before);
}

#[tokio::test]
async fn unknown_owner_is_user_not_found() {
    let h = memory_harness().await;
    let err = h
        .engine
        .create_post("T".into(), "C".into(), "ghost")
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::UserNotFound("ghost".into()));
    assert_eq!(h.store.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn edit_and_delete_are_ownership_scoped() {
    let h = memory_harness().await;
    let post = h.user_with_post("alice").await;
    h.engine.register(registration("bob")).await.unwrap();
    let before = snapshot(h.store.as_ref()).await;

    let edit = PostEdit {
        title: Some("bob was here".into()),
        content: None,
    };
    assert_eq!(
        h.engine.edit_post(post.id, "bob", edit).await.unwrap_err(),
        DomainError::PostNotFound(post.id)
    );
    assert_eq!(
        h.engine.delete_post(post.id, "bob").await.unwrap_err(),
        DomainError::PostNotFound(post.id)
    );
    assert_eq!(snapshot(h.store.as_ref()).await, before);
}

#[tokio::test]
async fn delete_removes_post_from_owner_and_store() {
    let h = memory_harness().await;
    let post = h.user_with_post("alice").await;
    let kept = h
        .engine
        .create_post("kept".into(), "body".into(), "alice")
        .await
        .unwrap();
    h.engine
        .view_post(post.id, &Caller::Anonymous)
        .await
        .unwrap();

    let summary = h.engine.delete_post(post.id, "alice").await.unwrap();
    assert_eq!(summary.id, post.id);
    assert_eq!(summary.title, "the prestige");

    assert_eq!(h.engine.list_user_posts("alice").await.unwrap(), vec![kept]);
    assert_eq!(h.store.count_posts().await.unwrap(), 1);

    // a second delete finds nothing in the owner's list
    assert_eq!(
        h.engine.delete_post(post.id, "alice").await.unwrap_err(),
        DomainError::PostNotFound(post.id)
    );
}

#[tokio::test]
async fn missing_post_is_not_found_everywhere() {
    let h = memory_harness().await;
    h.engine.register(registration("alice")).await.unwrap();
    let missing = Uuid::now_v7();

    assert_eq!(
        h.engine
            .edit_post(missing, "alice", PostEdit::default())
            .await
            .unwrap_err(),
        DomainError::PostNotFound(missing)
    );
    assert_eq!(
        h.engine.view_post(missing, &Caller::named("alice")).await.unwrap_err(),
        DomainError::PostNotFound(missing)
    );
    assert_eq!(
        h.engine
            .comment_on_post(missing, "hi".into(), "alice")
            .await
            .unwrap_err(),
        DomainError::PostNotFound(missing)
    );
    assert_eq!(
        h.engine.get_post(missing).await.unwrap_err(),
        DomainError::PostNotFound(missing)
    );
}
