//! Offer-letter HTML. Pure: no I/O, no clock.

use std::fmt::Write;

use crate::models::candidate::Candidate;
use crate::models::template::EmailTemplate;
use crate::offers::format::{escape_html, format_inr, format_long_date, format_rs};
use crate::offers::salary::SalaryBreakdown;

pub const ADDRESS_FALLBACK: &str = "To be confirmed";
pub const DATE_FALLBACK: &str = "TBD";
pub const TIME_FALLBACK: &str = "11:00 AM";

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.5; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 10px; }
    .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; text-align: center; border-radius: 10px 10px 0 0; }
    .header h1 { margin: 0; font-size: 24px; }
    .content { background: #f9f9f9; padding: 20px; border-radius: 0 0 10px 10px; }
    .details-box { background: white; padding: 15px; border-radius: 8px; margin: 15px 0; border-left: 4px solid #667eea; }
    .details-box p { margin: 5px 0; }
    .salary-table { width: 100%; border-collapse: collapse; margin: 15px 0; background: white; }
    .salary-table th, .salary-table td { padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }
    .salary-table th { background: #667eea; color: white; font-weight: bold; }
    .total-row { background: #f0f0f0; font-weight: bold; }
    .footer { text-align: left; margin-top: 15px; padding: 15px 0; color: #666; font-size: 14px; }
    .highlight { color: #667eea; font-weight: bold; }
    .note { background: #fff3cd; padding: 12px; border-radius: 5px; margin: 15px 0; border-left: 4px solid #ffc107; }
"#;

fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => escape_html(v),
        None => fallback.to_string(),
    }
}

/// Renders the complete offer email document.
pub fn render_offer_email(
    candidate: &Candidate,
    breakdown: &SalaryBreakdown,
    template: &EmailTemplate,
) -> String {
    let address = text_or(candidate.reporting_address.as_deref(), ADDRESS_FALLBACK);
    let date = candidate
        .reporting_date
        .map(format_long_date)
        .unwrap_or_else(|| DATE_FALLBACK.to_string());
    let time = text_or(candidate.reporting_time.as_deref(), TIME_FALLBACK);

    let rows = [
        ("Monthly Basic", breakdown.monthly_basic),
        ("Monthly HRA", breakdown.monthly_hra),
        ("Monthly Conveyance Allowance", breakdown.monthly_conveyance),
        ("Monthly Medical Allowance", breakdown.monthly_medical),
        ("Monthly Special Allowance", breakdown.monthly_special),
    ];

    let mut html = String::with_capacity(8 * 1024);
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n\
         <div class=\"header\"><h1>{header}</h1></div>\n\
         <div class=\"content\">\n\
         <p>Hi <strong>{name}</strong>,</p>\n\
         <p>Congratulations! We are excited to have you join us at <strong>{company}</strong>.</p>\n\
         <p>Attached is the offer letter that details the terms of your employment.</p>\n",
        header = escape_html(&template.header_text),
        name = escape_html(&candidate.full_name),
        company = escape_html(&template.company_name),
    );

    let _ = write!(
        html,
        "<div class=\"details-box\">\n\
         <h3 style=\"margin-top: 0; color: #667eea;\">Joining Details</h3>\n\
         <p><strong>Reporting Address:</strong> {address}</p>\n\
         <p><strong>Reporting Date:</strong> {date}</p>\n\
         <p><strong>Reporting Time:</strong> {time}</p>\n\
         <p><strong>Things to Carry:</strong> {carry}</p>\n\
         </div>\n\
         <p><strong>Salary Package:</strong> <span class=\"highlight\">{package} per annum</span></p>\n\
         <p>Welcome aboard, and we look forward to having you on the team.</p>\n",
        carry = escape_html(&template.things_to_carry),
        package = format_inr(breakdown.total_annual_gross),
    );

    html.push_str(
        "<h3>Fixed Salary Breakup</h3>\n<table class=\"salary-table\">\n\
         <thead><tr><th>Component</th><th>Amount (Monthly)</th></tr></thead>\n<tbody>\n",
    );
    for (label, amount) in rows {
        let _ = writeln!(
            html,
            "<tr><td>{label}</td><td>{}</td></tr>",
            format_inr(amount as f64)
        );
    }
    let _ = write!(
        html,
        "<tr class=\"total-row\"><td><strong>Total Monthly Gross Salary</strong></td><td><strong>{}</strong></td></tr>\n\
         <tr class=\"total-row\"><td><strong>Total Annual Gross Salary</strong></td><td><strong>{}</strong></td></tr>\n\
         </tbody>\n</table>\n",
        format_inr(breakdown.total_monthly_gross as f64),
        format_inr(breakdown.total_annual_gross),
    );

    let _ = write!(
        html,
        "<div class=\"note\"><strong>Note:</strong> PF of {pf} per month, Professional Tax of {pt} per month \
         and income tax (as applicable) would be deducted from the monthly gross salary to arrive at your \
         monthly net pay.</div>\n\
         <p>Please acknowledge this email for confirmation of the offer. If you have any queries regarding \
         the offer, please write back to us or call the undersigned on the given contact number.</p>\n",
        pf = format_rs(template.pf_deduction),
        pt = format_rs(template.professional_tax),
    );

    let _ = write!(
        html,
        "<div class=\"footer\">\n\
         <p style=\"margin: 0 0 3px 0;\"><strong>Warm Regards,</strong></p>\n\
         <p style=\"margin: 3px 0;\"><strong>{hr_name}</strong><br>PH: {hr_phone}<br>{team}</p>\n\
         <p style=\"margin: 3px 0 10px 0;\">\
         <a href=\"mailto:{hr_email}\" style=\"color: #667eea; text-decoration: none;\">{hr_email}</a> || \
         <a href=\"{website}\" style=\"color: #667eea; text-decoration: none;\">{website}</a></p>\n",
        hr_name = escape_html(&template.hr_name),
        hr_phone = escape_html(&template.hr_phone),
        team = escape_html(&template.hr_team_name),
        hr_email = escape_html(&template.hr_email),
        website = escape_html(&template.company_website),
    );
    if !template.company_logo_url.trim().is_empty() {
        let _ = writeln!(
            html,
            "<div style=\"margin-top: 6px;\"><img src=\"{}\" alt=\"{} Logo\" style=\"height: 40px; width: auto;\"></div>",
            escape_html(template.company_logo_url.trim()),
            escape_html(&template.company_name),
        );
    }
    html.push_str("</div>\n</div>\n</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::salary::calculate_breakdown;
    use crate::testing::candidate;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_embeds_breakdown_and_package() {
        let c = candidate("Asha Rao", Some(12.0));
        let html = render_offer_email(
            &c,
            &calculate_breakdown(1_200_000.0),
            &EmailTemplate::default(),
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Hi <strong>Asha Rao</strong>"));
        assert!(html.contains("₹12,00,000 per annum"));
        assert!(html.contains("<td>Monthly Basic</td><td>₹50,000</td>"));
        assert!(html.contains("<td>Monthly HRA</td><td>₹20,000</td>"));
        assert!(html.contains("<td>Monthly Special Allowance</td><td>₹27,150</td>"));
        assert!(html.contains("<strong>₹1,00,000</strong>"));
        assert!(html.contains("PF of Rs. 1,800 per month, Professional Tax of Rs. 200 per month"));
    }

    #[test]
    fn test_render_uses_fallbacks_for_missing_reporting_details() {
        let c = candidate("Asha Rao", Some(12.0));
        let html = render_offer_email(&c, &calculate_breakdown(1_200_000.0), &EmailTemplate::default());

        assert!(html.contains("<strong>Reporting Address:</strong> To be confirmed"));
        assert!(html.contains("<strong>Reporting Date:</strong> TBD"));
        assert!(html.contains("<strong>Reporting Time:</strong> 11:00 AM"));
    }

    #[test]
    fn test_render_uses_reporting_details_when_present() {
        let mut c = candidate("Asha Rao", Some(12.0));
        c.reporting_address = Some("4th Floor, MG Road".to_string());
        c.reporting_date = Some(Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
        c.reporting_time = Some("10 AM".to_string());
        let html = render_offer_email(&c, &calculate_breakdown(1_200_000.0), &EmailTemplate::default());

        assert!(html.contains("4th Floor, MG Road"));
        assert!(html.contains("March 3, 2025"));
        assert!(html.contains("10 AM"));
    }

    #[test]
    fn test_render_pulls_signature_from_template() {
        let template = EmailTemplate {
            hr_name: "Neha Iyer".to_string(),
            company_name: "Acme Tutors".to_string(),
            header_text: "Hello & Welcome".to_string(),
            things_to_carry: "ID proof".to_string(),
            pf_deduction: 2_000,
            company_logo_url: "https://cdn.example.com/logo.png".to_string(),
            ..EmailTemplate::default()
        };
        let c = candidate("Asha Rao", Some(12.0));
        let html = render_offer_email(&c, &calculate_breakdown(1_200_000.0), &template);

        assert!(html.contains("<strong>Neha Iyer</strong>"));
        assert!(html.contains("<strong>Acme Tutors</strong>"));
        assert!(html.contains("<h1>Hello &amp; Welcome</h1>"));
        assert!(html.contains("ID proof"));
        assert!(html.contains("PF of Rs. 2,000"));
        assert!(html.contains("src=\"https://cdn.example.com/logo.png\""));
    }

    #[test]
    fn test_render_omits_logo_when_unset() {
        let c = candidate("Asha Rao", Some(12.0));
        let html = render_offer_email(&c, &calculate_breakdown(1_200_000.0), &EmailTemplate::default());
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_render_escapes_candidate_text() {
        let c = candidate("<script>alert(1)</script>", Some(12.0));
        let html = render_offer_email(&c, &calculate_breakdown(1_200_000.0), &EmailTemplate::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
