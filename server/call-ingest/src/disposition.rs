//! Disposition code -> human-readable label.

/// Label for a known dialer disposition code. Lookup is case-sensitive.
pub fn label(code: &str) -> Option<&'static str> {
  let label = match code {
    "DROP" | "ADC" | "N" | "NAU" => "No Answer",
    "NA" => "No Answer Autodial",
    "PDROP" => "Outbound Pre-Routing",
    "A" => "Answering Machine",
    "AA" => "Answering Machine Auto",
    "AB" => "Busy Auto",
    "B" => "Busy",
    "CALLBK" => "Call Back",
    "CBL" => "Call Back Later",
    "DC" => "Disconnected Number",
    "DNC" => "Do Not Call",
    "Follow" => "Follow Up",
    "NI" => "Not Interested",
    "NPRSN" => "In Person Appointment",
    "Nurtre" => "Nurture",
    "PHNAPT" => "Phone Appointment",
    "WN" => "Wrong Number",
    _ => return None,
  };
  Some(label)
}

/// Translate a code to its label; unknown codes come back unchanged.
pub fn translate(code: &str) -> &str {
  match label(code) {
    Some(label) => label,
    None => code,
  }
}
