use super::*;
use crate::meeting::Status;
use crate::Normalizer;

fn pages() -> PageSet {
    PageSet::new()
        .with_page(Page::new(
            Url::parse(AGENDAS_URL).unwrap(),
            200,
            include_str!("../../../fixtures/il_port_district_agendas.html"),
        ))
        .with_page(Page::new(
            Url::parse(MINUTES_URL).unwrap(),
            200,
            include_str!("../../../fixtures/il_port_district_minutes.html"),
        ))
        .with_page(Page::new(
            Url::parse(SCHEDULES_URL).unwrap(),
            200,
            include_str!("../../../fixtures/il_port_district_schedules.html"),
        ))
}

fn parsed() -> Vec<MeetingDraft> {
    IlPortDistrictSpider::new().unwrap().parse(&pages()).unwrap()
}

fn at(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn test_count() {
    assert_eq!(parsed().len(), 6);
}

#[test]
fn test_titles() {
    let titles: Vec<_> = parsed().into_iter().map(|d| d.title).collect();
    assert_eq!(
        titles,
        vec![
            "Board Meeting",
            "Finance Committee Meeting",
            "Port Planning Session",
            "Special Board Meeting",
            "Finance Committee Meeting",
            "Board Meeting",
        ]
    );
}

#[test]
fn test_starts_follow_date_markers() {
    let starts: Vec<_> = parsed().into_iter().map(|d| d.start.unwrap()).collect();
    assert_eq!(
        starts,
        vec![
            at(1, 17, 9, 0),
            at(1, 10, 9, 0),
            at(3, 5, 9, 0),
            at(2, 21, 9, 0),
            // moved from February 14
            at(2, 28, 9, 0),
            // changed meeting time footnote
            at(3, 21, 10, 30),
        ]
    );
}

#[test]
fn test_special_marker_does_not_leak_to_later_dates() {
    let drafts = parsed();
    assert!(drafts[3].title.starts_with("Special"));
    assert!(!drafts[4].title.starts_with("Special"));
    assert!(!drafts[5].title.starts_with("Special"));
}

#[test]
fn test_classifications() {
    let classifications: Vec<_> = parsed().into_iter().map(|d| d.classification).collect();
    assert_eq!(
        classifications,
        vec![
            "Board",
            "Committee",
            "Not Classified",
            "Board",
            "Committee",
            "Board",
        ]
    );
}

#[test]
fn test_board_links_include_agenda_then_minutes() {
    let drafts = parsed();
    assert_eq!(
        drafts[0].links,
        vec![
            Link::new(
                "https://www.iipd.com/sites/default/files/2019-01/Board%20Meeting%20AgendaJanuary%202019.pdf",
                "Board Meeting Agenda January 2019",
            ),
            Link::new(
                "https://www.iipd.com/sites/default/files/2019-02/January%2017%2C%202019%20Minutes.pdf",
                "Board Meeting Minutes",
            ),
        ]
    );
}

#[test]
fn test_committee_and_unclassified_links() {
    let drafts = parsed();
    assert_eq!(
        drafts[1].links,
        vec![Link::new(
            "https://www.iipd.com/sites/default/files/2019-01/Finance%20Committee%20Meeting%20AgendaJanuary%202019.pdf",
            "Finance Committee Meeting Agenda January 2019",
        )]
    );
    assert!(drafts[2].links.is_empty());
    assert!(drafts[4].links.is_empty());
    assert!(drafts[5].links.is_empty());
}

#[test]
fn test_agendas_skip_other_files() {
    let page = Page::new(
        Url::parse(AGENDAS_URL).unwrap(),
        200,
        include_str!("../../../fixtures/il_port_district_agendas.html"),
    );
    let agendas = IlPortDistrictSpider::parse_agendas(&page).unwrap();
    assert_eq!(agendas.len(), 3);
    assert!(agendas.iter().all(|a| a.title.contains("Agenda")));
}

#[test]
fn test_minutes_keep_first_link_per_date() {
    let page = Page::new(
        Url::parse(MINUTES_URL).unwrap(),
        200,
        include_str!("../../../fixtures/il_port_district_minutes.html"),
    );
    let minutes = IlPortDistrictSpider::parse_minutes(&page).unwrap();

    assert_eq!(minutes.len(), 2);
    assert_eq!(
        minutes[&NaiveDate::from_ymd_opt(2019, 1, 17).unwrap()],
        "https://www.iipd.com/sites/default/files/2019-02/January%2017%2C%202019%20Minutes.pdf"
    );
    assert!(minutes.contains_key(&NaiveDate::from_ymd_opt(2018, 12, 13).unwrap()));
}

#[test]
fn test_date_markers() {
    assert_eq!(DateMarker::of("January 17").unwrap(), DateMarker::Regular);
    assert_eq!(DateMarker::of("***March 21").unwrap(), DateMarker::ChangedTime);
    assert_eq!(DateMarker::of("February 21**").unwrap(), DateMarker::Special);
    assert_eq!(
        DateMarker::of("February 14 (February 28 - NEW)*").unwrap(),
        DateMarker::Moved(Some("February 28".to_string()))
    );
    assert_eq!(
        DateMarker::of("*April 4").unwrap(),
        DateMarker::Moved(None)
    );
}

#[test]
fn test_location_and_source() {
    for draft in parsed() {
        assert_eq!(draft.location, IlPortDistrictSpider::location());
        assert_eq!(draft.source, SCHEDULES_URL);
        assert_eq!(draft.end, None);
    }
}

#[test]
fn test_changed_location_is_an_error() {
    let schedules = include_str!("../../../fixtures/il_port_district_schedules.html")
        .replace("3600 E. 95th St.", "100 W. Randolph St.");
    let pages = pages().with_page(Page::new(
        Url::parse(SCHEDULES_URL).unwrap(),
        200,
        schedules,
    ));

    let result = IlPortDistrictSpider::new().unwrap().parse(&pages);
    assert!(matches!(result, Err(ScraperError::ExtractionError(_))));
}

#[test]
fn test_missing_schedule_page() {
    let pages = PageSet::new().with_page(Page::new(
        Url::parse(AGENDAS_URL).unwrap(),
        200,
        "<html></html>",
    ));
    let result = IlPortDistrictSpider::new().unwrap().parse(&pages);
    assert!(matches!(result, Err(ScraperError::MissingPage(_))));
}

#[test]
fn test_finalized_meetings() {
    let normalizer = Normalizer::new("il_port_district");
    let meetings: Vec<_> = normalizer
        .finalize_all(parsed(), at(2, 21, 9, 0))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        meetings[3].id,
        "il_port_district/201902210900/x/special_board_meeting"
    );
    assert_eq!(meetings[3].status, Status::Passed);
    assert_eq!(meetings[4].status, Status::Tentative);
    assert_eq!(
        meetings[2].id,
        "il_port_district/201903050900/x/port_planning_session"
    );
}
