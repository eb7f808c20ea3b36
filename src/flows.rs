//! The UI flows driven against the repository
//!
//! Each function appends one named action to a scenario: the interaction
//! steps followed by the post-condition assertions that must hold before the
//! next action may run. Selector strings target the InvenioRDM UI and are an
//! external, versioned dependency of this crate.

use std::path::Path;

use crate::env::{Credentials, TestAccounts};
use crate::scenario::{Community, RecordMeta, Scenario};
use crate::step::Step;

/// Upper bound for the file upload progress bar to turn green.
pub const UPLOAD_TIMEOUT_MS: u64 = 30_000;

fn click(s: &mut Scenario, selector: &str) {
    s.push(Step::Click {
        selector: selector.to_string(),
        nth: None,
        timeout_ms: None,
    });
}

fn click_nth(s: &mut Scenario, selector: &str, nth: usize) {
    s.push(Step::Click {
        selector: selector.to_string(),
        nth: Some(nth),
        timeout_ms: None,
    });
}

fn fill(s: &mut Scenario, selector: &str, value: &str) {
    s.push(Step::Fill {
        selector: selector.to_string(),
        value: value.to_string(),
    });
}

/// Log in and block until the profile indicator is visible.
pub fn login(s: &mut Scenario, account: &Credentials) {
    s.push(Step::Navigate {
        url: "/login/".into(),
    });
    fill(s, r#"[placeholder="Email Address"]"#, &account.email);
    fill(s, r#"[placeholder="Password"]"#, &account.password);
    click(s, r#"role=button[name="Log in"]"#);
    s.push(Step::Wait {
        selector: "#user-profile-dropdown".into(),
        timeout_ms: crate::step::DEFAULT_WAIT_TIMEOUT_MS,
    });
}

/// Open the profile menu and select the log-out entry.
pub fn logout(s: &mut Scenario) {
    click(s, "#user-profile-dropdown-btn");
    click(s, "#user-profile-menu >> text= Log out ");
}

/// Reach the community creation form through the quick-create menu.
pub fn open_new_community_form(s: &mut Scenario) {
    click(s, "#quick-create-dropdown");
    click(s, "#quick-create-menu >> text=New community");
}

/// Fill the creation form and assert the redirect to the settings page,
/// whose URL is constructed deterministically from the slug.
pub fn create_community(s: &mut Scenario, community: &Community) {
    s.push(Step::AssertUrl {
        url: "/communities/new".into(),
    });
    s.push(Step::Assert {
        selector: "text=Setup your new community".into(),
        visible: Some(true),
        text_contains: None,
        min_count: None,
        timeout_ms: None,
    });

    fill(s, r#"[id="metadata.title"]"#, &community.name);
    fill(s, r#"[id="slug"]"#, &community.slug);
    click(s, r#"label.field-label-class:has-text("Public")"#);
    click(s, "text=Create community");

    let settings = community.settings_path();
    s.push(Step::WaitForUrl {
        url: settings.clone(),
    });
    s.push(Step::AssertUrl { url: settings });
}

/// Fill the upload form, attach the fixture file, publish, and assert the
/// published record page shows the expected title and creator.
pub fn create_record(s: &mut Scenario, record: &RecordMeta, fixture: &Path) {
    s.push(Step::Navigate {
        url: "/uploads/new".into(),
    });

    fill(s, r#"role=textbox[name="Title"]"#, &record.title);

    click_nth(s, r#"role=combobox[name="Resource type"]"#, 0);
    click(
        s,
        &format!(r#"role=option[name="{}"]"#, record.resource_type),
    );

    // Decline DOI reservation.
    click_nth(s, r#"text="No""#, 0);

    click(s, r#"role=button[name="Add creator"]"#);
    fill(s, "#creators", &record.creator_query);
    click(s, &format!("text={}", record.creator_option));
    click(s, r#"role=button[name="Save"]"#);

    s.push(Step::UploadFile {
        selector: r#"role=button[name="Upload files"]"#.into(),
        path: fixture.to_string_lossy().into_owned(),
    });
    s.push(Step::Assert {
        selector: ".progress.success".into(),
        visible: Some(true),
        text_contains: None,
        min_count: None,
        timeout_ms: Some(UPLOAD_TIMEOUT_MS),
    });

    // Publish, then confirm in the dialog.
    click(s, r#"role=button[name="Publish"]"#);
    click_nth(s, r#"role=button[name="Publish"]"#, 1);

    s.push(Step::Assert {
        selector: "#record-title".into(),
        visible: None,
        text_contains: Some(record.title.clone()),
        min_count: None,
        timeout_ms: None,
    });
    s.push(Step::Assert {
        selector: r#"[aria-label="Creators and contributors"] span"#.into(),
        visible: None,
        text_contains: Some(record.creator_display.clone()),
        min_count: None,
        timeout_ms: None,
    });
}

/// From a record detail page, open the community-selection dialog, pick the
/// community, accept the access consent, and submit the review request.
pub fn submit_to_community(s: &mut Scenario, community_name: &str) {
    s.push(Step::AssertUrlMatches {
        pattern: "/records/[a-zA-Z0-9]+".into(),
    });

    click(s, "#modal-dropdown");
    click(s, "#submit-to-community");
    s.push(Step::Assert {
        selector: "#community-modal-header".into(),
        visible: None,
        text_contains: Some("Select a community".into()),
        min_count: None,
        timeout_ms: None,
    });

    fill(
        s,
        r#"input[placeholder="Search in all communities"]"#,
        community_name,
    );
    click(s, r#"div.ui.fluid.action.input button[aria-label="Search"]"#);

    click(
        s,
        &format!(r#"role=button[name="Select {community_name}"]"#),
    );
    s.push(Step::Assert {
        selector: r#"div.header:text("Submit to community")"#.into(),
        visible: None,
        text_contains: None,
        min_count: Some(1),
        timeout_ms: None,
    });

    click(s, r#"label[for="acceptAccessToRecord"]"#);
    click(s, r#"button[name="submitReview"]"#);
}

/// As the community owner, locate the inclusion request through the
/// dashboard, accept it, and assert the record now lists in the community.
pub fn accept_request(s: &mut Scenario, community: &Community, record_title: &str) {
    s.push(Step::AssertUrl { url: "/".into() });

    click(s, r#"nav #invenio-menu a:has-text("My dashboard")"#);
    click(
        s,
        r#"div.ui.container.secondary.pointing.menu.page-subheader a:has-text("Communities")"#,
    );

    fill(
        s,
        r#"role=textbox[name="Search in my communities..."]"#,
        &community.name,
    );
    click(s, r#"#invenio-search-config >> role=button[name="Search"]"#);
    click(
        s,
        &format!(r#"a.ui.medium.header.mb-0:has-text("{}")"#, community.name),
    );
    click(s, r#"a.item:has-text("Requests")"#);

    // Accept the request matching the record title, then confirm.
    click(
        s,
        &format!(r#"div.content:has-text("{record_title}") >> role=button[name="Accept"]"#),
    );
    click(s, r#"[aria-label="accept"] >> role=button[name="Accept"]"#);

    click(s, r#"a.item:has-text("Records")"#);
    s.push(Step::Assert {
        selector: format!(r#"h2.header:has-text("{record_title}")"#),
        visible: Some(true),
        text_contains: None,
        min_count: None,
        timeout_ms: None,
    });
}

/// The combined scenario: the owner creates a community, the submitter
/// publishes a record and submits it, and the owner accepts the inclusion
/// request. Returns the scenario together with the entities it correlates on.
pub fn community_inclusion(
    accounts: &TestAccounts,
    fixture: &Path,
) -> (Scenario, Community, RecordMeta) {
    let community = Community::random();
    let record = RecordMeta::dataset("Playwright test");

    let mut s = Scenario::new("community-inclusion");

    login(&mut s, &accounts.owner);
    open_new_community_form(&mut s);
    create_community(&mut s, &community);
    logout(&mut s);

    login(&mut s, &accounts.submitter);
    create_record(&mut s, &record, fixture);
    submit_to_community(&mut s, &community.name);
    logout(&mut s);

    login(&mut s, &accounts.owner);
    accept_request(&mut s, &community, &record.title);

    (s, community, record)
}
