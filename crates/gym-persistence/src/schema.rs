//! Esquema Diesel (mantenido a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    clients (id) {
        id -> BigInt,
        name -> Text,
        email -> Text,
        phone -> Nullable<Text>,
        birth_date -> Nullable<Date>,
    }
}

diesel::table! {
    instructors (id) {
        id -> BigInt,
        name -> Text,
        specialty -> Nullable<Text>,
    }
}

diesel::table! {
    plans (id) {
        id -> BigInt,
        name -> Text,
        monthly_price -> Double,
        duration_months -> Integer,
    }
}

diesel::table! {
    exercises (id) {
        id -> BigInt,
        name -> Text,
        muscle_group -> Nullable<Text>,
    }
}

diesel::table! {
    workouts (id) {
        id -> BigInt,
        name -> Text,
        client_id -> Nullable<BigInt>,
        instructor_id -> Nullable<BigInt>,
        plan_id -> Nullable<BigInt>,
        start_date -> Date,
        end_date -> Nullable<Date>,
        objective -> Nullable<Text>,
        kind -> Nullable<Text>,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    workout_exercises (id) {
        id -> BigInt,
        workout_id -> BigInt,
        exercise_id -> BigInt,
        sets -> Text,
        reps -> Text,
        load -> Nullable<Text>,
        rest_seconds -> Nullable<Integer>,
        position -> Integer,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    payments (id) {
        id -> BigInt,
        client_id -> BigInt,
        paid_on -> Date,
        amount -> Double,
        settled -> Bool,
    }
}

diesel::joinable!(workout_exercises -> workouts (workout_id));
diesel::joinable!(workout_exercises -> exercises (exercise_id));
diesel::joinable!(payments -> clients (client_id));

diesel::allow_tables_to_appear_in_same_query!(
    clients,
    instructors,
    plans,
    exercises,
    workouts,
    workout_exercises,
    payments,
);
