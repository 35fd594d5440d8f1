//! Custom assertion macros

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a JSON error body has the standard `{"error", "status"}` shape
#[macro_export]
macro_rules! assert_error_body {
    ($body:expr, $status:expr, $message:expr) => {
        let body: &serde_json::Value = &$body;
        assert_eq!(body["status"], $status, "unexpected status in {}", body);
        assert_eq!(body["error"], $message, "unexpected message in {}", body);
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
