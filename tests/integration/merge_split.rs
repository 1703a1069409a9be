//! End-to-end merge and split scenarios through the foreground controller.

use crate::common::{init_logging, page_markers, pdf_bytes, read_archive, source_file};
use pdfsplice::{Mode, Recomposer, SPLIT_FALLBACK_JOB_NAME, SubmitRequest};

#[tokio::test]
async fn merge_two_documents_in_queue_order() {
    init_logging();
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.add_files(vec![
        source_file("first.pdf", pdf_bytes(3, 101)),
        source_file("second.pdf", pdf_bytes(2, 202)),
    ]);
    assert!(recomposer.readiness().can_submit);

    let output = recomposer.submit(SubmitRequest::default()).await.unwrap();
    assert_eq!(output.filename, "merged_document.pdf");

    let markers = page_markers(&output.bytes);
    assert_eq!(markers.len(), 5);
    // Pages 1-3 come from the first document, 4-5 from the second, each in
    // its original internal order.
    assert_eq!(
        markers,
        vec![(101, 701), (101, 702), (101, 703), (202, 701), (202, 702)]
    );
}

#[tokio::test]
async fn merge_honors_an_output_filename_override() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.add_files(vec![
        source_file("a.pdf", pdf_bytes(1, 1)),
        source_file("b.pdf", pdf_bytes(1, 2)),
    ]);

    let output = recomposer
        .submit(SubmitRequest {
            output_filename: Some("bundle.pdf".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(output.filename, "bundle.pdf");
}

#[tokio::test]
async fn reordering_the_queue_reorders_the_merge() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.add_files(vec![
        source_file("a.pdf", pdf_bytes(1, 11)),
        source_file("b.pdf", pdf_bytes(1, 22)),
        source_file("c.pdf", pdf_bytes(1, 33)),
    ]);
    // Move the last file to the front.
    recomposer.reorder(2, 0);

    let output = recomposer.submit(SubmitRequest::default()).await.unwrap();
    let widths: Vec<i64> = page_markers(&output.bytes)
        .into_iter()
        .map(|(width, _)| width)
        .collect();
    assert_eq!(widths, vec![33, 11, 22]);
}

#[tokio::test]
async fn split_names_entries_after_the_job_name() {
    init_logging();
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.set_mode(Mode::Split);
    recomposer.add_files(vec![source_file("source.pdf", pdf_bytes(4, 55))]);
    assert!(recomposer.readiness().can_submit);

    let output = recomposer
        .submit(SubmitRequest {
            job_name: Some("report".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(output.filename, "report.zip");

    let entries = read_archive(&output.bytes);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["report_1.pdf", "report_2.pdf", "report_3.pdf", "report_4.pdf"]
    );

    // Every entry is a single-page document reproducing its page.
    for (index, (_, bytes)) in entries.iter().enumerate() {
        let markers = page_markers(bytes);
        assert_eq!(markers, vec![(55, 701 + index as i64)]);
    }
}

#[tokio::test]
async fn split_with_blank_job_name_uses_the_fallback() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.set_mode(Mode::Split);
    recomposer.add_files(vec![source_file("source.pdf", pdf_bytes(2, 9))]);

    let output = recomposer
        .submit(SubmitRequest {
            job_name: Some("   ".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(output.filename, format!("{SPLIT_FALLBACK_JOB_NAME}.zip"));

    let names: Vec<String> = read_archive(&output.bytes)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        vec![
            format!("{SPLIT_FALLBACK_JOB_NAME}_1.pdf"),
            format!("{SPLIT_FALLBACK_JOB_NAME}_2.pdf"),
        ]
    );
}

#[tokio::test]
async fn split_mode_keeps_only_the_first_file_of_a_batch() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.set_mode(Mode::Split);
    let readiness = recomposer.add_files(vec![
        source_file("kept.pdf", pdf_bytes(3, 77)),
        source_file("dropped.pdf", pdf_bytes(9, 88)),
    ]);
    assert!(readiness.can_submit);
    assert_eq!(recomposer.files().len(), 1);
    assert_eq!(recomposer.files()[0].name(), "kept.pdf");

    let output = recomposer
        .submit(SubmitRequest {
            job_name: Some("pages".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Three entries: the split ran on the kept file, not the dropped one.
    assert_eq!(read_archive(&output.bytes).len(), 3);
}

#[tokio::test]
async fn switching_modes_clears_the_queue() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.add_files(vec![
        source_file("a.pdf", pdf_bytes(1, 1)),
        source_file("b.pdf", pdf_bytes(1, 2)),
    ]);
    assert_eq!(recomposer.files().len(), 2);

    let readiness = recomposer.set_mode(Mode::Split);
    assert!(recomposer.files().is_empty());
    assert!(!readiness.can_submit);
}

#[tokio::test]
async fn queue_drains_into_the_job_on_submission() {
    let mut recomposer = Recomposer::new();
    recomposer.wait_until_ready().await.unwrap();

    recomposer.add_files(vec![
        source_file("a.pdf", pdf_bytes(1, 1)),
        source_file("b.pdf", pdf_bytes(1, 2)),
    ]);
    recomposer.submit(SubmitRequest::default()).await.unwrap();

    // Buffer ownership moved into the job; the queue is empty again.
    assert!(recomposer.files().is_empty());
    assert!(!recomposer.readiness().can_submit);
}
