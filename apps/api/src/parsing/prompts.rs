// Resume parsing LLM prompt templates.
// All prompts for the parsing module are defined here.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a resume parser. Extract the following information from the resume text \
and return it as a JSON object. If any field is not found, set it to null.

Required fields:
- name: Full name of the person
- email: Email address
- phone: Phone number
- location: City, State/Country
- company: Current or most recent company
- position: Current or most recent job title
- title: Professional title or headline
- bio: A brief professional summary (2-3 sentences)
- website: Personal website URL (see the \"All Links Found\" section if present)
- linkedin: LinkedIn profile URL (see the \"All Links Found\" section if present)

All values must be strings or null.";

pub const RESUME_PARSE_PROMPT: &str = "Parse this resume text:\n\n{resume_text}";

/// Resume fields are short; this comfortably fits ten of them.
pub const RESUME_PARSE_MAX_TOKENS: u32 = 1000;
