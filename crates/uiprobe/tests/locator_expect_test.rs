// Integration tests for locators and wait conditions
//
// Exercised through a full Browser session against the scripted mock
// endpoint: visibility polling, strict class matching, and the fail-fast
// semantics of click().

mod mock_cdp;

use mock_cdp::{MockBehavior, MockCdp};
use std::time::Duration;
use uiprobe::{Browser, Error, expect};

#[tokio::test]
async fn test_to_be_visible_retries_until_the_element_renders() {
    let mock = MockCdp::start(MockBehavior {
        visibility: vec![false, false, true],
        ..Default::default()
    })
    .await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    expect(page.locator("#main-content"))
        .with_timeout(Duration::from_secs(2))
        .with_poll_interval(Duration::from_millis(10))
        .to_be_visible()
        .await
        .expect("element becomes visible on the third poll");

    // Three polls reached the endpoint
    let polls = mock
        .calls()
        .iter()
        .filter(|c| c.as_str() == "evaluate:visibility")
        .count();
    assert_eq!(polls, 3);

    browser.close().await.expect("close failed");
    assert!(mock.was_closed());
    mock.shutdown();
}

#[tokio::test]
async fn test_to_have_class_is_strict_about_extra_classes() {
    // The element ends up with an extra class; the strict comparison must
    // not accept it
    let mock = MockCdp::start(MockBehavior {
        attribute_values: vec![Some("dark high-contrast".to_string())],
        ..Default::default()
    })
    .await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    let result = expect(page.locator("body"))
        .with_timeout(Duration::from_millis(100))
        .with_poll_interval(Duration::from_millis(10))
        .to_have_class("dark")
        .await;

    match result {
        Err(Error::AssertionTimeout(message)) => {
            assert!(message.contains("dark high-contrast"), "got: {}", message);
        }
        other => panic!("expected assertion timeout, got {:?}", other.err()),
    }

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_to_have_class_repolls_while_element_is_missing() {
    let mock = MockCdp::start(MockBehavior {
        attribute_values: vec![None, None, Some("dark".to_string())],
        ..Default::default()
    })
    .await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    expect(page.locator("body"))
        .with_timeout(Duration::from_secs(2))
        .with_poll_interval(Duration::from_millis(10))
        .to_have_class("dark")
        .await
        .expect("a late-rendering element must not abort the wait");

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_to_have_attribute_matches_exact_values() {
    let mock = MockCdp::start(MockBehavior {
        attribute_values: vec![Some("dark".to_string())],
        ..Default::default()
    })
    .await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    expect(page.locator("body"))
        .with_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(10))
        .to_have_attribute("data-theme", "dark")
        .await
        .expect("attribute should match");

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_click_does_not_retry_missing_elements() {
    let mock = MockCdp::start(MockBehavior {
        click_point: None,
        ..Default::default()
    })
    .await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    let result = page.locator("#theme_toggle").click().await;
    match result {
        Err(Error::ElementNotFound(selector)) => assert_eq!(selector, "#theme_toggle"),
        other => panic!("expected ElementNotFound, got {:?}", other.err()),
    }

    // No input events may reach the page for a missing element
    assert!(mock.call_index("Input.dispatchMouseEvent", 0).is_none());

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_click_dispatches_press_and_release() {
    let mock = MockCdp::start(MockBehavior::default()).await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    page.locator("#theme_toggle").click().await.expect("click failed");

    let events = mock
        .calls()
        .iter()
        .filter(|c| c.as_str() == "Input.dispatchMouseEvent")
        .count();
    assert_eq!(events, 2, "press and release");

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_count_reports_matching_elements() {
    let mock = MockCdp::start(MockBehavior::default()).await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");
    let page = browser.new_page().await.expect("new_page failed");

    let count = page.locator("#main-content").count().await.expect("count failed");
    assert_eq!(count, 1);

    browser.close().await.expect("close failed");
    mock.shutdown();
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let mock = MockCdp::start(MockBehavior::default()).await;
    let browser = Browser::connect(&mock.url()).await.expect("connect failed");

    browser.close().await.expect("first close failed");
    browser.close().await.expect("second close must be a no-op");
    assert!(browser.is_closed());

    let closes = mock
        .calls()
        .iter()
        .filter(|c| c.as_str() == "Browser.close")
        .count();
    assert_eq!(closes, 1, "the session must be released exactly once");
    mock.shutdown();
}
