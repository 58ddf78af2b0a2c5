//! Contact form page object.
//!
//! # Locators
//!
//! | Element | Locator |
//! |---------|---------|
//! | Name input | `id=name` |
//! | Email input | `id=email` |
//! | Phone input | `id=phone` |
//! | Message textarea | `id=message` |
//! | Submit button | `css=button[type='submit']` |
//! | Success message | `id=successMessage` |
//! | Name error | `id=nameError` |
//! | Email error | `id=emailError` |
//! | Message error | `id=messageError` |
//!
//! # Example
//!
//! ```ignore
//! let contact = ContactPage::new(Page::new(session));
//! contact.open("file:///tmp/contact_form.html").await?;
//! contact
//!     .fill_form(&ContactForm::new("Ivan", "ivan@example.com").message("hello"))
//!     .await?;
//! contact.submit_form().await?;
//! assert!(contact.is_success_message_displayed().await);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::debug;

use crate::browser::{Locator, Page};
use crate::error::Result;

// ============================================================================
// ContactForm
// ============================================================================

/// Values for the contact form. Empty fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional phone.
    pub phone: String,
    /// Message body.
    pub message: String,
}

impl ContactForm {
    /// Creates a form with name and email.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Sets the phone.
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

// ============================================================================
// ContactPage
// ============================================================================

/// Page object for the contact form.
#[derive(Debug, Clone)]
pub struct ContactPage {
    page: Page,
}

// ============================================================================
// ContactPage - Locators
// ============================================================================

impl ContactPage {
    /// Name input.
    #[inline]
    #[must_use]
    pub fn name_input() -> Locator {
        Locator::id("name")
    }

    /// Email input.
    #[inline]
    #[must_use]
    pub fn email_input() -> Locator {
        Locator::id("email")
    }

    /// Phone input.
    #[inline]
    #[must_use]
    pub fn phone_input() -> Locator {
        Locator::id("phone")
    }

    /// Message textarea.
    #[inline]
    #[must_use]
    pub fn message_textarea() -> Locator {
        Locator::id("message")
    }

    /// Submit button.
    #[inline]
    #[must_use]
    pub fn submit_button() -> Locator {
        Locator::css("button[type='submit']")
    }

    /// Success banner.
    #[inline]
    #[must_use]
    pub fn success_message() -> Locator {
        Locator::id("successMessage")
    }

    /// Validation error under the name input.
    #[inline]
    #[must_use]
    pub fn name_error() -> Locator {
        Locator::id("nameError")
    }

    /// Validation error under the email input.
    #[inline]
    #[must_use]
    pub fn email_error() -> Locator {
        Locator::id("emailError")
    }

    /// Validation error under the message textarea.
    #[inline]
    #[must_use]
    pub fn message_error() -> Locator {
        Locator::id("messageError")
    }
}

// ============================================================================
// ContactPage - Constructor
// ============================================================================

impl ContactPage {
    /// Wraps a page.
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Returns the underlying page.
    #[inline]
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Opens the form at `url`.
    pub async fn open(&self, url: &str) -> Result<()> {
        self.page.open(url).await
    }
}

// ============================================================================
// ContactPage - Actions
// ============================================================================

impl ContactPage {
    /// Types into the name input.
    pub async fn fill_name(&self, name: &str) -> Result<()> {
        self.page.send_keys(&Self::name_input(), name).await
    }

    /// Types into the email input.
    pub async fn fill_email(&self, email: &str) -> Result<()> {
        self.page.send_keys(&Self::email_input(), email).await
    }

    /// Types into the phone input.
    pub async fn fill_phone(&self, phone: &str) -> Result<()> {
        self.page.send_keys(&Self::phone_input(), phone).await
    }

    /// Types into the message textarea.
    pub async fn fill_message(&self, message: &str) -> Result<()> {
        self.page.send_keys(&Self::message_textarea(), message).await
    }

    /// Fills every non-empty field of `form`.
    pub async fn fill_form(&self, form: &ContactForm) -> Result<()> {
        debug!(?form, "Filling contact form");
        if !form.name.is_empty() {
            self.fill_name(&form.name).await?;
        }
        if !form.email.is_empty() {
            self.fill_email(&form.email).await?;
        }
        if !form.phone.is_empty() {
            self.fill_phone(&form.phone).await?;
        }
        if !form.message.is_empty() {
            self.fill_message(&form.message).await?;
        }
        Ok(())
    }

    /// Clicks submit once it is clickable.
    pub async fn submit_form(&self) -> Result<()> {
        self.page.click(&Self::submit_button()).await
    }
}

// ============================================================================
// ContactPage - Assertions
// ============================================================================

impl ContactPage {
    /// Waits up to the default timeout for the success banner.
    pub async fn is_success_message_displayed(&self) -> bool {
        self.page.is_element_visible(&Self::success_message()).await
    }

    /// Reads the success banner (empty while hidden).
    pub async fn success_message_text(&self) -> Result<String> {
        self.page.get_text(&Self::success_message()).await
    }

    /// Returns `true` if the banner never shows during `duration`.
    pub async fn success_message_stays_hidden(&self, duration: Duration) -> Result<bool> {
        self.page
            .stays_invisible(&Self::success_message(), duration)
            .await
    }

    /// Waits up to the default timeout for the name error.
    pub async fn is_name_error_displayed(&self) -> bool {
        self.page.is_element_visible(&Self::name_error()).await
    }

    /// Reads the name error.
    pub async fn name_error_text(&self) -> Result<String> {
        self.page.get_text(&Self::name_error()).await
    }

    /// Waits up to the default timeout for the email error.
    pub async fn is_email_error_displayed(&self) -> bool {
        self.page.is_element_visible(&Self::email_error()).await
    }

    /// Reads the email error.
    pub async fn email_error_text(&self) -> Result<String> {
        self.page.get_text(&Self::email_error()).await
    }

    /// Waits up to the default timeout for the message error.
    pub async fn is_message_error_displayed(&self) -> bool {
        self.page.is_element_visible(&Self::message_error()).await
    }

    /// Reads the message error.
    pub async fn message_error_text(&self) -> Result<String> {
        self.page.get_text(&Self::message_error()).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;
    use crate::session::{MemorySession, NodeSpec, PageState, RemoteSession};

    const FORM_URL: &str = "file:///tmp/contact_form.html";
    const SUCCESS_TEXT: &str = "Form submitted successfully. Thank you for your message.";
    const NAME_REQUIRED: &str = "The \"Name\" field is required";
    const EMAIL_INVALID: &str = "Enter a valid email address";
    const MESSAGE_REQUIRED: &str = "The \"Message\" field is required";

    /// Contact form whose submit handler validates and reveals the banner
    /// 300ms later, like the page script does.
    fn contact_form() -> Arc<MemorySession> {
        let memory = Arc::new(MemorySession::new());
        memory.set_title("Contact form");
        for input in [
            ContactPage::name_input(),
            ContactPage::email_input(),
            ContactPage::phone_input(),
            ContactPage::message_textarea(),
        ] {
            memory.add(NodeSpec::new(input));
        }
        memory.add(NodeSpec::new(ContactPage::submit_button()).text("Send"));
        memory.add(NodeSpec::new(ContactPage::success_message()).hidden());
        memory.add(NodeSpec::new(ContactPage::name_error()).hidden());
        memory.add(NodeSpec::new(ContactPage::email_error()).hidden());
        memory.add(NodeSpec::new(ContactPage::message_error()).hidden());
        memory.on_click(ContactPage::submit_button(), validate_and_submit);
        memory
    }

    fn validate_and_submit(page: &mut PageState) {
        for error in [
            ContactPage::name_error(),
            ContactPage::email_error(),
            ContactPage::message_error(),
        ] {
            page.hide(&error);
        }

        let mut valid = true;
        if page.value_of(&ContactPage::name_input()).trim().is_empty() {
            page.set_text(&ContactPage::name_error(), NAME_REQUIRED);
            page.show(&ContactPage::name_error());
            valid = false;
        }
        if !page.value_of(&ContactPage::email_input()).contains('@') {
            page.set_text(&ContactPage::email_error(), EMAIL_INVALID);
            page.show(&ContactPage::email_error());
            valid = false;
        }
        if page.value_of(&ContactPage::message_textarea()).trim().is_empty() {
            page.set_text(&ContactPage::message_error(), MESSAGE_REQUIRED);
            page.show(&ContactPage::message_error());
            valid = false;
        }

        if valid {
            page.set_text(&ContactPage::success_message(), SUCCESS_TEXT);
            page.show_after(&ContactPage::success_message(), Duration::from_millis(300));
        }
    }

    async fn open(memory: &Arc<MemorySession>) -> ContactPage {
        let session: Arc<dyn RemoteSession> = memory.clone();
        let contact = ContactPage::new(Page::new(session));
        contact.open(FORM_URL).await.expect("open");
        contact.page().refresh().await.expect("refresh");
        contact
    }

    #[test]
    fn test_locator_table() {
        assert_eq!(ContactPage::name_input().to_string(), "id=name");
        assert_eq!(
            ContactPage::submit_button().to_string(),
            "css=button[type='submit']"
        );
        assert_eq!(ContactPage::success_message().to_string(), "id=successMessage");
    }

    #[test]
    fn test_contact_form_builder() {
        let form = ContactForm::new("Ivan", "ivan@example.com").message("hello");
        assert_eq!(form.name, "Ivan");
        assert!(form.phone.is_empty());
        assert_eq!(form.message, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_submission_shows_success() {
        let memory = contact_form();
        let contact = open(&memory).await;
        assert_eq!(contact.page().title().await.expect("title"), "Contact form");

        contact
            .fill_form(&ContactForm::new("Ivan", "ivan@example.com").message("hello"))
            .await
            .expect("fill");
        contact.submit_form().await.expect("submit");

        let start = Instant::now();
        assert!(contact.is_success_message_displayed().await);
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(
            contact.success_message_text().await.expect("text"),
            SUCCESS_TEXT
        );
        assert!(!contact.page().is_element_present(&Locator::id("missing")).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_name_shows_error_and_no_success() {
        let memory = contact_form();
        let contact = open(&memory).await;

        contact
            .fill_form(&ContactForm::new("", "ivan@example.com").message("hello"))
            .await
            .expect("fill");
        contact.submit_form().await.expect("submit");

        assert!(contact.is_name_error_displayed().await);
        assert_eq!(contact.name_error_text().await.expect("text"), NAME_REQUIRED);

        let timeout = contact.page().wait_config().timeout;
        let start = Instant::now();
        assert!(
            contact
                .success_message_stays_hidden(timeout)
                .await
                .expect("probe")
        );
        assert!(start.elapsed() >= timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill_form_skips_empty_fields() {
        let memory = contact_form();
        let contact = open(&memory).await;

        contact.fill_phone("+7 900").await.expect("phone");
        contact
            .fill_form(&ContactForm::new("Ivan", ""))
            .await
            .expect("fill");

        assert_eq!(memory.value_of(&ContactPage::name_input()), "Ivan");
        assert_eq!(memory.value_of(&ContactPage::phone_input()), "+7 900");
        assert_eq!(memory.value_of(&ContactPage::email_input()), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_email_and_missing_message() {
        let memory = contact_form();
        let contact = open(&memory).await;

        contact
            .fill_form(&ContactForm::new("Ivan", "not-an-email"))
            .await
            .expect("fill");
        contact.submit_form().await.expect("submit");

        assert!(contact.is_email_error_displayed().await);
        assert_eq!(contact.email_error_text().await.expect("text"), EMAIL_INVALID);
        assert!(contact.is_message_error_displayed().await);
        assert_eq!(
            contact.message_error_text().await.expect("text"),
            MESSAGE_REQUIRED
        );
        assert!(!contact.page().is_element_visible(&ContactPage::name_error()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_resets_form() {
        let memory = contact_form();
        let contact = open(&memory).await;

        contact.fill_name("Ivan").await.expect("fill");
        contact.page().refresh().await.expect("refresh");
        assert_eq!(memory.value_of(&ContactPage::name_input()), "");
    }
}
