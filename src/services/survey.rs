//! Public client questionnaire reached through the builder's survey link.

use uuid::Uuid;

use crate::api::SurveyWriter;
use crate::domain::survey::SurveyDraft;
use crate::domain::types::BuilderId;
use crate::dto::Alert;
use crate::dto::survey::SurveyPageData;
use crate::forms::survey::{SurveyAction, SurveyPost};
use crate::services::{ServiceError, ServiceResult};
use crate::stash::PhotoStash;

/// What to show after the questionnaire was posted.
#[derive(Debug)]
pub enum SurveyOutcome {
    /// The survey reached the backend.
    Submitted,
    /// Render the form again, with a notice when something went wrong.
    Form {
        page: SurveyPageData,
        alert: Option<Alert>,
    },
}

/// An empty questionnaire for the builder named in the link.
pub fn load_survey_page(builder_id: Option<BuilderId>) -> ServiceResult<SurveyPageData> {
    let builder_id = builder_id.ok_or(ServiceError::NotFound)?;
    Ok(SurveyPageData::new(builder_id, &SurveyDraft::new()))
}

/// Handles one post of the questionnaire.
///
/// Photos accepted by earlier posts are taken from the stash, the requested
/// removal and the new batch are applied, and the selection is parked again
/// whenever the form is shown once more. A refresh only recomputes
/// visibility and derived areas. A submit validates the draft and sends it;
/// any problem keeps the visitor on the form with their answers.
pub async fn handle_survey_post<A, P>(
    api: &A,
    stash: &P,
    builder_id: Option<BuilderId>,
    post: SurveyPost,
) -> ServiceResult<SurveyOutcome>
where
    A: SurveyWriter + ?Sized,
    P: PhotoStash + ?Sized,
{
    let builder_id = builder_id.ok_or(ServiceError::NotFound)?;
    let SurveyPost {
        mut draft,
        action,
        batch,
        draft_key,
        remove_photo,
        mut field_errors,
    } = post;

    let key = draft_key
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .unwrap_or_else(Uuid::new_v4);
    let mut photos = stash.take(&key).unwrap_or_default();
    if let Some(index) = remove_photo {
        photos.remove(index);
    }
    if !batch.is_empty() {
        if let Err(err) = photos.accept(batch) {
            field_errors.push(err.to_string());
        }
    }
    draft.photos = photos;

    let rerender = |draft: SurveyDraft, alert: Option<Alert>| {
        let page = SurveyPageData::new(builder_id, &draft).with_draft_key(key);
        stash.put(key, draft.photos);
        SurveyOutcome::Form { page, alert }
    };

    if !field_errors.is_empty() {
        log::warn!("Survey post for builder {builder_id} refused: {field_errors:?}");
        return Ok(rerender(draft, Some(Alert::error(field_errors.join(" ")))));
    }
    if action == SurveyAction::Refresh {
        return Ok(rerender(draft, None));
    }

    let submission = match draft.clone().into_submission(Some(builder_id)) {
        Ok(submission) => submission,
        Err(err) => return Ok(rerender(draft, Some(Alert::error(err.to_string())))),
    };

    match api.submit_survey(&submission).await {
        Ok(()) => {
            log::info!("Survey submitted for builder {builder_id}");
            Ok(SurveyOutcome::Submitted)
        }
        Err(err) => {
            log::error!("Failed to submit survey for builder {builder_id}: {err}");
            let message = format!(
                "Error submitting survey: {err}. Please try again or contact the builder directly."
            );
            Ok(rerender(draft, Some(Alert::error(message))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockBackend;
    use crate::domain::survey::{FieldId, PhotoFile};
    use crate::stash::MemoryPhotoStash;

    fn complete_draft() -> SurveyDraft {
        let mut draft = SurveyDraft::new();
        for (field, value) in [
            (FieldId::FullName, "Jane Doe"),
            (FieldId::PhoneNumber, "0400 111 222"),
            (FieldId::MeasurementType, "calculate"),
            (FieldId::Length, "3"),
            (FieldId::Width, "2"),
            (FieldId::Height, "2.5"),
            (FieldId::PropertyType, "House or Unit"),
            (FieldId::HomeAge, "10-30 years old"),
            (FieldId::TilePreference, "premium"),
            (FieldId::IncludeTiles, "yes"),
            (FieldId::ToiletMove, "stay"),
            (FieldId::WallChange, "no"),
        ] {
            draft.set(field, value).unwrap();
        }
        draft
    }

    fn post(draft: SurveyDraft, action: SurveyAction) -> SurveyPost {
        SurveyPost {
            draft,
            action,
            ..SurveyPost::default()
        }
    }

    fn photo(name: &str) -> PhotoFile {
        PhotoFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    fn builder() -> Option<BuilderId> {
        BuilderId::new(12).ok()
    }

    fn form_page(outcome: SurveyOutcome) -> (SurveyPageData, Option<Alert>) {
        match outcome {
            SurveyOutcome::Form { page, alert } => (page, alert),
            SurveyOutcome::Submitted => panic!("expected the form"),
        }
    }

    #[test]
    fn link_without_builder_is_invalid() {
        assert!(matches!(load_survey_page(None), Err(ServiceError::NotFound)));
        assert_eq!(load_survey_page(builder()).unwrap().builder_id, 12);
    }

    #[actix_web::test]
    async fn refresh_never_submits() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();

        let outcome = handle_survey_post(
            &api,
            &stash,
            builder(),
            post(complete_draft(), SurveyAction::Refresh),
        )
        .await
        .unwrap();

        let (page, alert) = form_page(outcome);
        assert!(alert.is_none());
        assert_eq!(page.areas.total_area, "31.00");
        assert!(page.draft_key.is_some());
    }

    #[actix_web::test]
    async fn photos_survive_refresh_and_removal() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();

        let mut first = post(complete_draft(), SurveyAction::Refresh);
        first.batch = vec![photo("a.jpg"), photo("b.jpg")];
        let (page, _) = form_page(
            handle_survey_post(&api, &stash, builder(), first).await.unwrap(),
        );
        assert_eq!(page.photo_names, vec!["a.jpg", "b.jpg"]);
        let key = page.draft_key.clone();

        let mut second = post(complete_draft(), SurveyAction::Refresh);
        second.draft_key = key.clone();
        second.batch = vec![photo("c.jpg")];
        let (page, _) = form_page(
            handle_survey_post(&api, &stash, builder(), second).await.unwrap(),
        );
        assert_eq!(page.photo_names, vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(page.draft_key, key);

        let mut third = post(complete_draft(), SurveyAction::Refresh);
        third.draft_key = key.clone();
        third.remove_photo = Some(1);
        let (page, _) = form_page(
            handle_survey_post(&api, &stash, builder(), third).await.unwrap(),
        );
        assert_eq!(page.photo_names, vec!["a.jpg", "c.jpg"]);
    }

    #[actix_web::test]
    async fn submit_sends_photos_from_earlier_posts() {
        let mut api = MockBackend::new();
        api.expect_submit_survey()
            .withf(|survey| {
                let names: Vec<_> = survey.photos.iter().map(|p| p.file_name.as_str()).collect();
                names == ["a.jpg", "b.jpg"]
            })
            .times(1)
            .returning(|_| Ok(()));
        let stash = MemoryPhotoStash::default();

        let mut first = post(complete_draft(), SurveyAction::Refresh);
        first.batch = vec![photo("a.jpg")];
        let (page, _) = form_page(
            handle_survey_post(&api, &stash, builder(), first).await.unwrap(),
        );

        let mut second = post(complete_draft(), SurveyAction::Submit);
        second.draft_key = page.draft_key;
        second.batch = vec![photo("b.jpg")];
        let outcome = handle_survey_post(&api, &stash, builder(), second)
            .await
            .unwrap();

        assert!(matches!(outcome, SurveyOutcome::Submitted));
        assert!(stash.is_empty());
    }

    #[actix_web::test]
    async fn oversized_batch_keeps_earlier_photos() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();

        let mut first = post(complete_draft(), SurveyAction::Refresh);
        first.batch = (0..8).map(|i| photo(&format!("{i}.jpg"))).collect();
        let (page, _) = form_page(
            handle_survey_post(&api, &stash, builder(), first).await.unwrap(),
        );

        let mut second = post(complete_draft(), SurveyAction::Submit);
        second.draft_key = page.draft_key;
        second.batch = (0..3).map(|i| photo(&format!("extra-{i}.jpg"))).collect();
        let (page, alert) = form_page(
            handle_survey_post(&api, &stash, builder(), second).await.unwrap(),
        );

        assert_eq!(page.photo_names.len(), 8);
        assert!(alert.unwrap().message.contains("You currently have 8 file(s)"));
    }

    #[actix_web::test]
    async fn unreadable_answers_block_submission_but_keep_the_rest() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();
        let mut submission = post(complete_draft(), SurveyAction::Submit);
        submission.field_errors = vec!["Invalid value for Property type: Castle".to_string()];

        let (page, alert) = form_page(
            handle_survey_post(&api, &stash, builder(), submission)
                .await
                .unwrap(),
        );

        assert!(alert.unwrap().message.contains("Castle"));
        assert_eq!(page.areas.total_area, "31.00");
    }

    #[actix_web::test]
    async fn incomplete_submit_lists_missing_fields() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();
        let mut draft = complete_draft();
        draft.set(FieldId::PhoneNumber, "").unwrap();

        let outcome = handle_survey_post(&api, &stash, builder(), post(draft, SurveyAction::Submit))
            .await
            .unwrap();

        let (_, alert) = form_page(outcome);
        assert!(alert.unwrap().message.contains("Contact number"));
    }

    #[actix_web::test]
    async fn complete_submit_reaches_backend() {
        let mut api = MockBackend::new();
        api.expect_submit_survey()
            .withf(|survey| {
                survey.builder_id.get() == 12
                    && survey.total_area == 31.0
                    && survey.bathroom_type == "Master Bathroom"
            })
            .times(1)
            .returning(|_| Ok(()));
        let stash = MemoryPhotoStash::default();

        let outcome = handle_survey_post(
            &api,
            &stash,
            builder(),
            post(complete_draft(), SurveyAction::Submit),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, SurveyOutcome::Submitted));
    }

    #[actix_web::test]
    async fn backend_failure_keeps_answers() {
        let mut api = MockBackend::new();
        api.expect_submit_survey()
            .returning(|_| Err(ApiError::Network("refused".to_string())));
        let stash = MemoryPhotoStash::default();

        let mut submission = post(complete_draft(), SurveyAction::Submit);
        submission.batch = vec![photo("a.jpg")];
        let (page, alert) = form_page(
            handle_survey_post(&api, &stash, builder(), submission)
                .await
                .unwrap(),
        );

        assert!(alert.unwrap().message.starts_with("Error submitting survey: Network error"));
        let name = page
            .steps
            .iter()
            .flat_map(|s| &s.fields)
            .find(|f| f.id == "full_name")
            .unwrap();
        assert_eq!(name.value, "Jane Doe");
        assert_eq!(page.photo_names, vec!["a.jpg"]);
        assert_eq!(stash.len(), 1);
    }

    #[actix_web::test]
    async fn rejected_photo_batch_blocks_submission() {
        let api = MockBackend::new();
        let stash = MemoryPhotoStash::default();
        let mut submission = post(complete_draft(), SurveyAction::Submit);
        submission.batch = vec![PhotoFile::new("notes.pdf", "application/pdf", vec![1])];

        let (page, alert) = form_page(
            handle_survey_post(&api, &stash, builder(), submission)
                .await
                .unwrap(),
        );

        assert!(alert.is_some());
        assert!(page.photo_names.is_empty());
    }
}
