use super::client::ChatMessage;

/// Fixed persona for every tailoring call.
pub const TAILOR_SYSTEM: &str = "You are a specialized resume editor focused on tailoring resumes \
for product management positions with expertise in data-centric SaaS and cloud platforms.";

/// Evaluation rubric sent with every request. Replace `{resume}` and
/// `{job_description}` before sending. The rubric and its weights are fixed
/// rather than configurable per request, so the extracted score stays
/// comparable across users and over time.
const TAILOR_PROMPT_TEMPLATE: &str = r#"Here is the resume:
{resume}

Job Description:
{job_description}

You are a professional product manager resume evaluator equipped with advanced AI tools to analyze resumes for alignment with job descriptions. Your task is to provide a detailed evaluation of the resume uploaded by the candidate. Follow the steps below to generate a comprehensive analysis:
Provide a detailed breakdown of the strengths and weaknesses across the following categories:

1. **Analyze the Resume & Job Description**:
   - Carefully review each section of the resume (skills, experience, projects) to identify existing skills, responsibilities, and achievements.
   - Extract and understand key skills, qualifications, and responsibilities from the job description, particularly data governance, metadata management, agile processes, and cloud technologies. Use these to inform your editing.

2. **Edit and Align Experience with Job Description**:
   - Modify each bullet point in the experience section to align with the job description.
   - Integrate specific keywords related to product management roles naturally into relevant bullet points, reflecting alignment with the job's required skills.
   - Reformat each bullet to emphasize impact, e.g., "Achieved [X]% improvement in [metric] by implementing [Y] technique."

3. **Optimize the Skills Section**:
   - Highlight essential skills from the job description and certifications (if any) required for the product-based role.
   - Add specific cloud and programming tools from the job description where applicable to emphasize technical alignment.

4. **Quantify Achievements**:
   - Ensure each bullet has a quantifiable metric (e.g., percentage improvements, user engagement) where applicable.
   - If quantifiable results aren't provided, estimate logically based on standard industry outcomes for similar roles.

5. **Use Impact-Oriented Action Verbs**:
   - Begin each bullet point with a strong action verb that communicates initiative, leadership, and results. Examples: Spearheaded, Optimized, Integrated, Enhanced.

6. **Tailored Suggestions for Improvement**:
   - Provide specific, resume-based suggestions for improving alignment with the job description, such as missing keywords to add, relevant certifications to highlight, product development experience to elaborate, product management competencies to surface, and formatting consistency fixes.

7. **Scoring Criteria: Assign a total score out of 100, considering the following weighted criteria**:
    - Relevance to Job Roles (30%): Evaluate whether the skills and experience listed are pertinent to a product management role.
    - Use of Keywords (25%): Assess whether the resume includes product management critical keywords like "agile development," "data governance," "cloud platforms," and "product lifecycle management."
    - Formatting & Presentation (20%): Judge the visual appeal and structural organization of the resume.
    - Quantifiable Achievements (15%): Score based on how effectively the resume demonstrates impact using metrics or tangible results.
    - Language & Professional Tone (10%): Evaluate the professionalism and clarity of the text.

8. **Scoring and Suggestions Delivery**:
    - Conclude with a concise summary of the resume's strengths and a prioritized list of next steps for improvement.
    - Present the total score alongside the analysis for clarity.

Additional Instructions:
   - Ensure the tone remains professional and concise, fitting a mid- to senior-level product management position.
   - Tailor language to effectively convey the candidate's qualifications for a data-centric product management role.

Note - The final score should be referred to as "Total Score".
Only evaluate resumes against job descriptions focused on product management or related product-based roles. If a provided job description is unrelated, clearly state that the evaluation applies only to product-related descriptions."#;

/// Builds the fixed two-message prompt: persona plus rubric with the two
/// text blobs substituted in.
pub fn build_messages(resume_text: &str, job_description: &str) -> Vec<ChatMessage> {
    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{resume}", resume_text)
        .replace("{job_description}", job_description);
    vec![
        ChatMessage::system(TAILOR_SYSTEM),
        ChatMessage::user(prompt),
    ]
}
