// Askama template definitions

use askama::Template;

use crate::model::crops::CropProfile;

// Home page: measurement form, inline errors, search results
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub username: String,
    pub error: Option<String>,
    pub search_results: Option<Vec<&'static str>>,
}

// Prediction result (also re-rendered by /result from the session)
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub username: String,
    pub crop: Option<String>,
    pub crop_image: String,
}

// Static reference data for all 22 crops
#[derive(Template)]
#[template(path = "description.html")]
pub struct DescriptionTemplate {
    pub crops: &'static [CropProfile],
}

// Login form
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

// Registration form
#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub username: String,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub username: String,
}
