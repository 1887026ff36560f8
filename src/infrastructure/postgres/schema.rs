diesel::table! {
    users (user_id) {
        user_id -> Uuid,
        email -> Text,
        full_name -> Nullable<Text>,
        tier_id -> Nullable<Int4>,
        role -> Text,
        is_active -> Bool,
        storage_used_mb -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tiers (tier_id) {
        tier_id -> Int4,
        name -> Text,
        max_storage_mb -> Int8,
        max_recordings -> Int4,
        max_duration_per_recording_sec -> Int4,
        max_ai_minutes_monthly -> Nullable<Int4>,
        allow_diarization -> Bool,
        allow_summarization -> Bool,
    }
}

diesel::table! {
    folders (folder_id) {
        folder_id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        parent_folder_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recordings (recording_id) {
        recording_id -> Uuid,
        user_id -> Uuid,
        folder_id -> Nullable<Uuid>,
        title -> Text,
        file_path -> Nullable<Text>,
        original_file_name -> Nullable<Text>,
        duration_seconds -> Nullable<Float8>,
        file_size_mb -> Nullable<Float8>,
        source_type -> Text,
        status -> Text,
        is_pinned -> Bool,
        is_trashed -> Bool,
        deleted_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    recording_tags (recording_id, tag) {
        recording_id -> Uuid,
        tag -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    transcripts (transcript_id) {
        transcript_id -> Uuid,
        recording_id -> Uuid,
        version_no -> Int4,
        #[sql_name = "type"]
        type_ -> Text,
        language -> Text,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    transcript_segments (segment_id) {
        segment_id -> Uuid,
        transcript_id -> Uuid,
        sequence -> Int4,
        start_time -> Float8,
        end_time -> Float8,
        content -> Text,
        speaker_label -> Text,
        confidence -> Float8,
        is_user_edited -> Bool,
    }
}

diesel::table! {
    recording_speakers (speaker_id) {
        speaker_id -> Uuid,
        recording_id -> Uuid,
        speaker_label -> Text,
        display_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    summaries (summary_id) {
        summary_id -> Uuid,
        recording_id -> Uuid,
        version_no -> Int4,
        #[sql_name = "type"]
        type_ -> Text,
        summary_style -> Text,
        content_structure -> Jsonb,
        is_latest -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    export_jobs (export_id) {
        export_id -> Uuid,
        user_id -> Uuid,
        recording_id -> Uuid,
        export_type -> Text,
        status -> Text,
        file_path -> Nullable<Text>,
        error_message -> Nullable<Text>,
        created_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    audit_logs (log_id) {
        log_id -> Int8,
        user_id -> Nullable<Uuid>,
        action_type -> Text,
        resource_type -> Text,
        resource_id -> Nullable<Text>,
        status -> Text,
        details -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    ai_usage_logs (usage_id) {
        usage_id -> Int8,
        user_id -> Nullable<Uuid>,
        recording_id -> Nullable<Uuid>,
        action_type -> Text,
        duration_seconds -> Nullable<Float8>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recording_tags -> recordings (recording_id));
diesel::joinable!(transcript_segments -> transcripts (transcript_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tiers,
    folders,
    recordings,
    recording_tags,
    transcripts,
    transcript_segments,
    recording_speakers,
    summaries,
    export_jobs,
    audit_logs,
    ai_usage_logs,
);
