//! Minimal HTML rendering for the entry form and the public info page.
//!
//! Every record value is escaped. The banner branches only on the
//! precomputed expiry status. The form script only calls the JSON API and
//! writes server text through `textContent`.

use pharmaqr_core::{DisplayModel, ExpiryStatus, REQUIRED_FIELDS};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Text,
    Date,
    Area,
}

/// Form controls in display order: (field, label, control, placeholder).
const FORM_FIELDS: [(&str, &str, Control, &str); 11] = [
    ("name", "Tablet Name", Control::Text, "e.g., Paracetamol"),
    ("manufacturer", "Manufacturer", Control::Text, "e.g., ABC Pharmaceuticals"),
    ("batch_number", "Batch Number", Control::Text, "e.g., BTH001234"),
    ("mfg_date", "Manufacturing Date", Control::Date, ""),
    ("expiry_date", "Expiry Date", Control::Date, ""),
    ("composition", "Composition", Control::Area, "Active ingredients and their quantities"),
    ("dosage", "Dosage", Control::Text, "e.g., 500mg twice daily"),
    ("use_cases", "Medical Uses", Control::Area, "Conditions this medication treats"),
    ("side_effects", "Side Effects", Control::Area, "Common side effects"),
    ("precautions", "Precautions", Control::Area, "Important precautions and warnings"),
    ("storage_instructions", "Storage Instructions", Control::Area, "How to store this medication"),
];

const FORM_SCRIPT: &str = r##"<script>
const form = document.getElementById('tabletForm');
const messages = document.getElementById('messages');
const display = document.getElementById('qrDisplay');
function show(kind, text) {
  messages.className = 'banner ' + kind;
  messages.textContent = text;
}
form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const payload = {};
  for (const [key, value] of new FormData(form).entries()) { payload[key] = value; }
  try {
    const created = await fetch('/api/tablets', {
      method: 'POST',
      headers: {'Content-Type': 'application/json'},
      body: JSON.stringify(payload),
    }).then((response) => response.json());
    if (!created.success) { show('expired', created.error); return; }
    const code = await fetch('/api/qrcode/' + created.tablet_id).then((response) => response.json());
    if (!code.qr_code) { show('expired', code.error); return; }
    show('ok', created.message);
    display.replaceChildren();
    const image = document.createElement('img');
    image.src = code.qr_code;
    image.alt = 'QR code';
    const link = document.createElement('a');
    link.href = code.qr_data;
    link.textContent = code.qr_data;
    const summary = document.createElement('p');
    const info = code.tablet_info;
    summary.textContent = info.name + ' / ' + info.manufacturer + ' / batch ' + info.batch_number
      + ' / expires ' + info.expiry_date;
    display.append(image, summary, link);
    form.reset();
  } catch (err) {
    show('expired', 'Request failed: ' + err);
  }
});
</script>"##;

/// Entry form page. Static: no record data is interpolated.
pub fn render_index_page() -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let _ = write!(
        html,
        "<title>Pharmaceutical QR Code Manager</title><style>{PAGE_STYLE}\
         label{{display:block;margin-top:10px;font-weight:bold}}\
         input,textarea{{width:100%;padding:6px;box-sizing:border-box}}\
         .ok{{background:#d4edda;color:#155724}}</style></head><body>"
    );
    html.push_str("<h1>Pharmaceutical QR Code Manager</h1><h2>Add New Tablet</h2>");
    html.push_str("<div id=\"messages\"></div>");
    html.push_str("<form id=\"tabletForm\" action=\"/api/tablets\" method=\"post\">");

    for (field, label, control, placeholder) in FORM_FIELDS {
        let required = REQUIRED_FIELDS.contains(&field);
        let marker = if required { " *" } else { "" };
        let required_attr = if required { " required" } else { "" };
        let _ = write!(html, "<label for=\"{field}\">{}{marker}</label>", escape_html(label));
        let placeholder = escape_html(placeholder);
        let _ = match control {
            Control::Text => write!(
                html,
                "<input type=\"text\" id=\"{field}\" name=\"{field}\" placeholder=\"{placeholder}\"{required_attr}>"
            ),
            Control::Date => write!(
                html,
                "<input type=\"date\" id=\"{field}\" name=\"{field}\"{required_attr}>"
            ),
            Control::Area => write!(
                html,
                "<textarea id=\"{field}\" name=\"{field}\" placeholder=\"{placeholder}\"{required_attr}></textarea>"
            ),
        };
    }

    html.push_str("<p><button type=\"submit\">Create Tablet &amp; Generate QR Code</button></p></form>");
    html.push_str("<div class=\"card\"><h2>Generated QR Code</h2><div id=\"qrDisplay\">\
                   <p>Submit the form to generate a QR code.</p></div></div>");
    html.push_str(FORM_SCRIPT);
    html.push_str("</body></html>");
    html
}

const PAGE_STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:0 auto;padding:16px}\
.banner{padding:12px;border-radius:6px;margin:16px 0}\
.expiring_soon{background:#fff3cd;color:#856404}\
.expired{background:#f8d7da;color:#721c24}\
.card{border:1px solid #ddd;border-radius:6px;padding:12px;margin:12px 0}";

pub fn render_info_page(model: &DisplayModel) -> String {
    let mut html = String::with_capacity(2048);
    let title = escape_html(&model.name);

    html.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let _ = write!(html, "<title>{title} - Tablet Information</title>");
    let _ = write!(html, "<style>{PAGE_STYLE}</style></head><body>");

    let _ = write!(
        html,
        "<h1>{title}</h1><p>Manufactured by <strong>{}</strong></p>",
        escape_html(&model.manufacturer)
    );
    let _ = write!(
        html,
        "<div class=\"card\"><p>Batch Number: <strong>{}</strong></p>\
         <p>Manufacturing Date: <strong>{}</strong></p>\
         <p>Expiry Date: <strong>{}</strong></p></div>",
        escape_html(&model.batch_number),
        escape_html(&model.mfg_date_display),
        escape_html(&model.expiry_date_display)
    );

    match model.status {
        ExpiryStatus::ExpiringSoon => {
            let _ = write!(
                html,
                "<div class=\"banner expiring_soon\"><strong>Warning:</strong> \
                 This medication expires in {} days.</div>",
                model.days_to_expiry
            );
        }
        ExpiryStatus::Expired => html.push_str(
            "<div class=\"banner expired\"><strong>EXPIRED:</strong> \
             This medication expired. DO NOT USE.</div>",
        ),
        ExpiryStatus::Ok => {}
    }

    let _ = write!(
        html,
        "<div class=\"card\"><h2>Composition &amp; Dosage</h2>\
         <p><strong>Active Ingredients:</strong> {}</p>\
         <p><strong>Dosage:</strong> {}</p></div>",
        escape_html(&model.composition),
        escape_html(&model.dosage)
    );
    push_card(&mut html, "Medical Uses", &model.use_cases);
    for section in model.sections() {
        push_card(&mut html, section.title, section.body);
    }

    html.push_str("<p><small>Always consult your healthcare provider.</small></p></body></html>");
    html
}

pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Error</title></head>\
         <body><h1>Error</h1><p>{}</p></body></html>",
        escape_html(message)
    )
}

fn push_card(html: &mut String, title: &str, body: &str) {
    let _ = write!(
        html,
        "<div class=\"card\"><h2>{}</h2><p>{}</p></div>",
        escape_html(title),
        escape_html(body)
    );
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
