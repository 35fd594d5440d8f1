//! Property tests for credential resolution
//!
//! Whatever the credential, `resolve_optional` never fails and
//! `resolve_required` only ever succeeds for a token the server signed for
//! an active user.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use proptest::prelude::*;

use scrapyflow::backend::auth::{
    AuthError, Identity, InMemoryUserStore, NewUser, SessionAuthenticator, TokenKeys, User, UserStore,
};

fn setup() -> (SessionAuthenticator, User, String) {
    tokio_test::block_on(async {
        let store = Arc::new(InMemoryUserStore::new());
        let user = store
            .create_user(NewUser {
                email: "ada@example.com".to_string(),
                full_name: "ada".to_string(),
                hashed_password: "hash".to_string(),
            })
            .await
            .unwrap();
        let keys = TokenKeys::new(b"proptest-secret", Algorithm::HS256, Duration::from_secs(3600));
        let token = keys.create_token(user.id).unwrap();
        (SessionAuthenticator::new(keys, store), user, token)
    })
}

proptest! {
    #[test]
    fn arbitrary_credentials_are_anonymous(credential in ".*") {
        let (auth, _user, _token) = setup();

        let identity = tokio_test::block_on(auth.resolve_optional(Some(&credential)));
        prop_assert_eq!(identity, Identity::Anonymous);

        let required = tokio_test::block_on(auth.resolve_required(Some(&credential)));
        prop_assert_eq!(required.err(), Some(AuthError::Unauthorized));
    }

    #[test]
    fn tampered_tokens_are_rejected(index in any::<prop::sample::Index>(), replacement in "[A-Za-z0-9_-]") {
        let (auth, _user, token) = setup();
        let position = index.index(token.len());
        let original = &token[position..position + 1];
        prop_assume!(original != replacement && original != ".");

        let mut tampered = token.clone();
        tampered.replace_range(position..position + 1, &replacement);

        let identity = tokio_test::block_on(auth.resolve_optional(Some(&tampered)));
        prop_assert_eq!(identity, Identity::Anonymous);
    }

    #[test]
    fn signed_token_resolves_to_its_user(_seed in 0u8..4) {
        let (auth, user, token) = setup();

        let resolved = tokio_test::block_on(auth.resolve_required(Some(&token))).unwrap();
        prop_assert_eq!(resolved.id, user.id);
        let identity = tokio_test::block_on(auth.resolve_optional(Some(&token)));
        prop_assert_eq!(identity, Identity::User(user.id));
    }
}
