use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;

use super::buckets::{Bucket, Buckets};
use crate::dates::{format_display_date, format_live_date, format_report_date};
use crate::models::ProjectRecord;

const BRAND_COLOR: &str = "#ED1C24";
const WORDMARK: &str = "HUNCH — WIP";
const FOOTER: &str = "WIP updated by Dot@hunch";

/// Everything the report shows besides the projects themselves
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub client_name: String,
    pub header_image_url: Option<String>,
    pub today: NaiveDate,
}

/// Escape text for use in HTML content and attribute values
fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the complete WIP email document
pub fn render_wip_email(context: &ReportContext, buckets: &Buckets) -> Result<String> {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("</head>\n");
    html.push_str("<body style=\"margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f5f5f5;\">\n");
    html.push_str("  <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"max-width: 600px; margin: 0 auto; background-color: #ffffff;\">\n");

    write_header(&mut html, context)?;

    for (bucket, projects) in buckets.sections() {
        write_section(&mut html, bucket, projects)?;
    }

    // Footer
    html.push_str("    <tr>\n");
    html.push_str("      <td style=\"padding: 25px 20px; border-top: 1px solid #eee; text-align: center;\">\n");
    writeln!(
        html,
        "        <p style=\"margin: 0; font-size: 12px; color: #999;\">{FOOTER}</p>"
    )?;
    html.push_str("      </td>\n    </tr>\n");

    html.push_str("  </table>\n</body>\n</html>\n");

    Ok(html)
}

fn write_header(html: &mut String, context: &ReportContext) -> Result<()> {
    html.push_str("    <tr>\n");
    writeln!(
        html,
        "      <td style=\"border-bottom: 4px solid {BRAND_COLOR}; padding: 20px;\">"
    )?;

    match context.header_image_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => writeln!(
            html,
            "        <img src=\"{}\" width=\"600\" alt=\"\" style=\"width: 100%; max-width: 600px; height: auto; display: block;\">",
            html_escape(url)
        )?,
        None => writeln!(
            html,
            "        <span style=\"font-size: 28px; font-weight: bold; color: {BRAND_COLOR};\">{WORDMARK}</span>"
        )?,
    }

    writeln!(
        html,
        "        <p style=\"margin: 15px 0 0 0; font-size: 22px; font-weight: bold; color: #333;\">{}</p>",
        html_escape(&context.client_name)
    )?;
    writeln!(
        html,
        "        <p style=\"margin: 5px 0 0 0; font-size: 12px; color: #999;\">{}</p>",
        format_report_date(context.today)
    )?;
    html.push_str("      </td>\n    </tr>\n");

    Ok(())
}

fn write_section(html: &mut String, bucket: Bucket, projects: &[ProjectRecord]) -> Result<()> {
    let noun = if projects.len() == 1 { "project" } else { "projects" };

    html.push_str("    <tr>\n");
    html.push_str("      <td style=\"padding: 20px 20px 0 20px;\">\n");
    writeln!(
        html,
        "        <div style=\"background-color: {}; color: #ffffff; padding: 8px 15px; font-size: 14px; font-weight: bold; border-radius: 3px;\">{} {} <span style=\"float: right; font-weight: normal;\">{} {}</span></div>",
        bucket.color(),
        bucket.icon(),
        bucket.title(),
        projects.len(),
        noun
    )?;
    html.push_str("      </td>\n    </tr>\n");

    for project in projects {
        write_project(html, bucket, project)?;
    }

    Ok(())
}

fn write_project(html: &mut String, bucket: Bucket, project: &ProjectRecord) -> Result<()> {
    html.push_str("    <tr>\n");
    html.push_str("      <td style=\"padding: 15px 20px; border-bottom: 1px solid #eee;\">\n");
    writeln!(
        html,
        "        <p style=\"margin: 0 0 5px 0; font-size: 16px; font-weight: bold; color: #333;\">{} — {}</p>",
        html_escape(&project.job_number),
        html_escape(&project.job_name)
    )?;
    writeln!(
        html,
        "        <p style=\"margin: 0 0 10px 0; font-size: 14px; color: #666; line-height: 1.4;\">{}</p>",
        html_escape(&project.description)
    )?;

    html.push_str("        <table cellpadding=\"0\" cellspacing=\"0\" style=\"font-size: 13px; color: #888;\">\n");
    if bucket == Bucket::RecentlyCompleted {
        if !project.stage.is_empty() {
            writeln!(
                html,
                "          <tr><td colspan=\"2\" style=\"padding: 2px 0 6px 0;\"><span style=\"background-color: {}; color: #ffffff; padding: 2px 8px; border-radius: 10px; font-size: 11px;\">{}</span></td></tr>",
                bucket.color(),
                html_escape(&project.stage)
            )?;
        }
        write_detail(html, "Completed on", &format_display_date(&project.status_changed))?;
        write_detail(html, "Live by", &format_live_date(&project.live_date))?;
    } else {
        write_detail(html, "Owner", &project.project_owner)?;
        write_detail(html, "Update", &project.latest_update)?;
        write_detail(html, "Stage", &project.stage)?;
        write_detail(html, "Due on", &format_display_date(&project.update_due))?;
        write_detail(html, "Live by", &format_live_date(&project.live_date))?;
    }
    html.push_str("        </table>\n");
    html.push_str("      </td>\n    </tr>\n");

    Ok(())
}

fn write_detail(html: &mut String, label: &str, value: &str) -> Result<()> {
    writeln!(
        html,
        "          <tr><td style=\"padding: 2px 10px 2px 0;\"><strong>{label}:</strong></td><td>{}</td></tr>",
        html_escape(value)
    )?;
    Ok(())
}
