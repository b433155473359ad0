//! Diesel schema definitions for CodeMeter server.

diesel::table! {
    users (id) {
        id -> Text,
        email -> Text,
        name -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    code_analyses (id) {
        id -> Text,
        user_id -> Text,
        title -> Text,
        code -> Text,
        language -> Text,
        target_company -> Text,
        overall_score -> Int4,
        time_complexity -> Text,
        space_complexity -> Text,
        analysis_result -> Text,
        file_url -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    user_progress (id) {
        id -> Text,
        user_id -> Text,
        total_analyses -> Int4,
        average_score -> Float8,
        best_score -> Int4,
        favorite_language -> Nullable<Text>,
        target_companies -> Array<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::joinable!(code_analyses -> users (user_id));
diesel::joinable!(user_progress -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, code_analyses, user_progress);
