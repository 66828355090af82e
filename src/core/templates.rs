use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::model::{EmailMessage, ProspectSubmission};
use crate::utils::error::Result;

/// Business details baked into the two outbound messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessProfile {
    pub sender: String,
    pub owner: String,
    pub company: String,
    pub pricing_url: String,
    pub contact_phone: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            sender: "russ@instantask.co".to_string(),
            owner: "russ@instantask.co".to_string(),
            company: "Instantask".to_string(),
            pricing_url: "https://instantask.co/pricing".to_string(),
            contact_phone: "(123) 456-7890".to_string(),
        }
    }
}

const AUTORESPONDER_TEXT: &str = "Hello {{ prospect.name }},

Thank you for contacting {{ business.company }}! We're excited to learn about your project and how we can help streamline your business with custom digital tools.

Our tasks start at $499, covering a single function or calculation, like a pricing calculator or cost estimator. Learn more at {{ business.pricing_url }}.

We'll reach out soon to discuss your needs, or reply to this email or call us at {{ business.contact_phone }} to share your project details.

Best regards,
The {{ business.company }} Team
";

const AUTORESPONDER_HTML: &str = r#"<h2>Hello {{ prospect.name }},</h2>
<p>Thank you for contacting {{ business.company }}! We're excited to learn about your project and how we can help streamline your business with custom digital tools.</p>
<p>Our tasks start at $499, covering a single function or calculation, like a pricing calculator or cost estimator. Learn more on our <a href="{{ business.pricing_url }}" style="color: #2563eb;">pricing page</a>.</p>
<p>We'll reach out soon to discuss your needs, or reply to this email or call us at {{ business.contact_phone }} to share your project details.</p>
<p>Best regards,<br>The {{ business.company }} Team</p>
"#;

const NOTIFICATION_TEXT: &str = "New Prospect Submission

Name: {{ prospect.name }}
Email: {{ prospect.email }}
Phone: {{ prospect.phone }}

Please follow up with this prospect to discuss their project.
";

const NOTIFICATION_HTML: &str = r#"<h2>New Prospect Submission</h2>
<p><strong>Name:</strong> {{ prospect.name }}</p>
<p><strong>Email:</strong> {{ prospect.email }}</p>
<p><strong>Phone:</strong> {{ prospect.phone }}</p>
<p>Please follow up with this prospect to discuss their project.</p>
"#;

/// Renders the autoresponder and owner notification.
///
/// `.html` templates are autoescaped by Tera; `.txt` bodies keep submitted
/// values as typed.
pub struct EmailTemplates {
    profile: BusinessProfile,
    engine: Tera,
}

impl EmailTemplates {
    pub fn new(profile: BusinessProfile) -> Result<Self> {
        let mut engine = Tera::default();
        engine.add_raw_templates(vec![
            ("autoresponder.txt", AUTORESPONDER_TEXT),
            ("autoresponder.html", AUTORESPONDER_HTML),
            ("notification.txt", NOTIFICATION_TEXT),
            ("notification.html", NOTIFICATION_HTML),
        ])?;

        Ok(Self { profile, engine })
    }

    /// Thank-you message to the person who filled in the form.
    pub fn autoresponder(&self, prospect: &ProspectSubmission) -> Result<EmailMessage> {
        let context = self.context(prospect);

        Ok(EmailMessage {
            from: self.profile.sender.clone(),
            to: prospect.email.clone(),
            subject: format!("Thank You for Reaching Out to {}!", self.profile.company),
            text: self.engine.render("autoresponder.txt", &context)?,
            html: self.engine.render("autoresponder.html", &context)?,
        })
    }

    /// Heads-up to the business owner with the submitted details.
    pub fn notification(&self, prospect: &ProspectSubmission) -> Result<EmailMessage> {
        let context = self.context(prospect);

        Ok(EmailMessage {
            from: self.profile.sender.clone(),
            to: self.profile.owner.clone(),
            subject: "New Contact Form Submission".to_string(),
            text: self.engine.render("notification.txt", &context)?,
            html: self.engine.render("notification.html", &context)?,
        })
    }

    fn context(&self, prospect: &ProspectSubmission) -> Context {
        let mut context = Context::new();
        context.insert("prospect", prospect);
        context.insert("business", &self.profile);
        context
    }
}
