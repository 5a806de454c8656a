//! Inline HTML bodies for the two transactional emails. The email provider
//! has no template storage, so the markup lives here.

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Invitation sent to every participant of a freshly paid trip.
pub fn trip_invite(name: &str, code: &str, base_url: &str) -> RenderedEmail {
    let subject = "Your surprise trip is waiting".to_string();
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 560px; margin: 0 auto;">
  <h1>Pack your curiosity, {name}!</h1>
  <p>Someone paid for a surprise trip and you're on the list.
     Tell us what makes you tick and we'll pick the destination.</p>
  <p style="font-size: 24px; letter-spacing: 4px; font-weight: bold;">{code}</p>
  <p><a href="{base_url}/questionnaire?code={code}">Fill in your questionnaire</a>
     with the access code above.</p>
  <p>The destination stays secret until departure. That's the point.</p>
</div>"#,
        name = name,
        code = code,
        base_url = base_url,
    );
    RenderedEmail { subject, html }
}

/// Confirmation sent to a gift card buyer, carrying the redeemable code.
pub fn gift_card(recipient_name: &str, code: &str, base_url: &str) -> RenderedEmail {
    let subject = "Your gift card is ready".to_string();
    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 560px; margin: 0 auto;">
  <h1>A surprise trip for {recipient_name}</h1>
  <p>Here is the gift card code to pass along:</p>
  <p style="font-size: 24px; letter-spacing: 4px; font-weight: bold;">{code}</p>
  <p>It can be redeemed any time at <a href="{base_url}/redeem">{base_url}/redeem</a>.</p>
</div>"#,
        recipient_name = recipient_name,
        code = code,
        base_url = base_url,
    );
    RenderedEmail { subject, html }
}
