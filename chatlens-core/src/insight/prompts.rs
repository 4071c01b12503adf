//! Prompt templates for each analysis mode.

pub(super) const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

pub(super) const SYSTEM_PROMPT: &str = "You are an expert social media analyst specializing in live chat analysis. You provide detailed, insightful, and actionable analysis of online community interactions. Your analysis is always backed by specific examples and evidence from the data.";

pub(super) const COMPREHENSIVE: &str = "\
Please analyze this YouTube live chat data and provide comprehensive insights:

**Analysis Required:**
1. **Key Themes & Topics**: What are the main subjects being discussed?
2. **Most Frequent Questions**: What questions do viewers ask most often?
3. **Sentiment & Mood**: What's the overall emotional tone and audience engagement level?
4. **Notable Moments**: Any significant reactions, trending topics, or viral moments?
5. **Community Engagement**: How is the audience interacting? Are there power users, moderators active?
6. **Content Feedback**: What do viewers think about the content being streamed?

**Chat Messages:**
{transcript}

Please provide detailed insights with specific examples from the chat where relevant.";

pub(super) const QUESTIONS: &str = "\
Please extract and analyze all the questions asked by viewers in this YouTube live chat.

**Tasks:**
1. **Identify Questions**: Find all direct and indirect questions
2. **Categorize by Topic**: Group similar questions together
3. **Frequency Analysis**: Which questions or question types appear most often?
4. **Answer Status**: Which questions seem answered vs unanswered?
5. **Question Quality**: Are questions technical, casual, or seeking clarification?

**Chat Messages:**
{transcript}

Format your response with clear categories and specific examples.";

pub(super) const SENTIMENT: &str = "\
Please analyze the emotional tone and sentiment of this YouTube live chat.

**Analysis Focus:**
1. **Overall Sentiment**: Positive, negative, or neutral tone?
2. **Emotional Patterns**: Excitement, frustration, confusion, appreciation?
3. **Engagement Level**: How actively engaged is the audience?
4. **Community Vibe**: Supportive, critical, or mixed?
5. **Mood Changes**: Any shifts in sentiment during the chat?
6. **Standout Reactions**: Notable emotional responses or reactions?

**Chat Messages:**
{transcript}

Provide specific examples and explain the reasoning behind your sentiment analysis.";

pub(super) const THEMES: &str = "\
Please identify and analyze the main themes and topics discussed in this YouTube live chat.

**Analysis Goals:**
1. **Primary Themes**: What are the 3-5 most discussed topics?
2. **Trending Topics**: What subjects gained momentum during the chat?
3. **Recurring Discussions**: What topics keep coming up repeatedly?
4. **Topic Evolution**: How do conversations shift and develop?
5. **Audience Interests**: What does the chat reveal about viewer preferences?
6. **Content Alignment**: How well do chat topics align with the stream content?

**Chat Messages:**
{transcript}

Organize your response by theme and provide supporting evidence from the chat.";
